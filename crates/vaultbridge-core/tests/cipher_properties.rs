//! Property-based tests driving the full command flow.
//!
//! For arbitrary keys, IVs, offsets, and payloads: data encrypted out to
//! the device comes back intact through a decrypting session, and the
//! device never holds the plaintext.

use proptest::prelude::*;
use vaultbridge_core::{CipherService, SessionHandle, device::MemoryEeprom, store::MemoryStore};
use vaultbridge_crypto::{Algorithm, BLOCK_SIZE, CipherMode, MAX_TRANSFER};
use vaultbridge_proto::{Opcode, OutBuf, Param, Params};

type Service = CipherService<MemoryStore, MemoryEeprom>;

fn seal_key(svc: &mut Service, handle: SessionHandle, key: &[u8]) {
    let mut params = Params::new([Param::In(key), Param::None, Param::None, Param::None]);
    svc.invoke(handle, Opcode::WriteRaw.to_raw(), &mut params).expect("WRITE_RAW failed");
}

fn prepare(svc: &mut Service, handle: SessionHandle, algorithm: Algorithm, key_len: usize, mode: CipherMode) {
    let mut params = Params::new([
        Param::Value(algorithm.to_raw()),
        Param::Value(key_len as u32),
        Param::Value(mode.to_raw()),
        Param::None,
    ]);
    svc.invoke(handle, Opcode::Prepare.to_raw(), &mut params).expect("PREPARE failed");
}

fn set_iv(svc: &mut Service, handle: SessionHandle, iv: &[u8]) {
    let mut params = Params::new([Param::In(iv), Param::None, Param::None, Param::None]);
    svc.invoke(handle, Opcode::SetIv.to_raw(), &mut params).expect("SET_IV failed");
}

fn encrypt(svc: &mut Service, handle: SessionHandle, plaintext: &[u8], offset: u32) {
    let mut scratch = vec![0u8; MAX_TRANSFER];
    let mut params = Params::new([
        Param::In(plaintext),
        Param::Out(OutBuf::new(&mut scratch)),
        Param::Value(offset),
        Param::None,
    ]);
    svc.invoke(handle, Opcode::Cipher.to_raw(), &mut params).expect("CIPHER encrypt failed");
}

fn decrypt(svc: &mut Service, handle: SessionHandle, offset: u32) -> Vec<u8> {
    let mut dest = vec![0u8; MAX_TRANSFER];
    {
        let mut params = Params::new([
            Param::In(&[]),
            Param::Out(OutBuf::new(&mut dest)),
            Param::Value(offset),
            Param::None,
        ]);
        svc.invoke(handle, Opcode::Cipher.to_raw(), &mut params).expect("CIPHER decrypt failed");
    }
    dest
}

fn arbitrary_key() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        proptest::collection::vec(any::<u8>(), 16),
        proptest::collection::vec(any::<u8>(), 32),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ctr_payloads_survive_the_device(
        key in arbitrary_key(),
        iv in proptest::collection::vec(any::<u8>(), BLOCK_SIZE),
        plaintext in proptest::collection::vec(any::<u8>(), 1..=MAX_TRANSFER),
        offset in 0u32..=((64 * 1024 - MAX_TRANSFER) as u32),
    ) {
        let device = MemoryEeprom::new();
        let mut svc = CipherService::new(MemoryStore::new(), device);

        let writer = svc.open_session().expect("open failed");
        seal_key(&mut svc, writer, &key);
        prepare(&mut svc, writer, Algorithm::Ctr, key.len(), CipherMode::Encrypt);
        set_iv(&mut svc, writer, &iv);
        encrypt(&mut svc, writer, &plaintext, offset);

        let reader = svc.open_session().expect("open failed");
        prepare(&mut svc, reader, Algorithm::Ctr, key.len(), CipherMode::Decrypt);
        set_iv(&mut svc, reader, &iv);
        let recovered = decrypt(&mut svc, reader, offset);

        prop_assert_eq!(&recovered[..plaintext.len()], &plaintext[..]);
    }

    #[test]
    fn block_mode_payloads_survive_the_device(
        algorithm in prop_oneof![Just(Algorithm::Ecb), Just(Algorithm::Cbc)],
        key in arbitrary_key(),
        iv in proptest::collection::vec(any::<u8>(), BLOCK_SIZE),
        blocks in proptest::collection::vec(
            proptest::collection::vec(any::<u8>(), BLOCK_SIZE),
            1..=(MAX_TRANSFER / BLOCK_SIZE),
        ),
    ) {
        let plaintext: Vec<u8> = blocks.concat();
        let mut svc = CipherService::new(MemoryStore::new(), MemoryEeprom::new());

        let writer = svc.open_session().expect("open failed");
        seal_key(&mut svc, writer, &key);
        prepare(&mut svc, writer, algorithm, key.len(), CipherMode::Encrypt);
        set_iv(&mut svc, writer, &iv);
        encrypt(&mut svc, writer, &plaintext, 0);

        let reader = svc.open_session().expect("open failed");
        prepare(&mut svc, reader, algorithm, key.len(), CipherMode::Decrypt);
        set_iv(&mut svc, reader, &iv);
        let recovered = decrypt(&mut svc, reader, 0);

        prop_assert_eq!(&recovered[..plaintext.len()], &plaintext[..]);
    }

    /// The device cells never equal a non-trivial plaintext.
    #[test]
    fn device_never_sees_plaintext(
        key in arbitrary_key(),
        iv in proptest::collection::vec(any::<u8>(), BLOCK_SIZE),
        plaintext in proptest::collection::vec(1u8..=255, 64..=512),
    ) {
        let device = MemoryEeprom::new();
        let mut svc = CipherService::new(MemoryStore::new(), device.clone());

        let writer = svc.open_session().expect("open failed");
        seal_key(&mut svc, writer, &key);
        prepare(&mut svc, writer, Algorithm::Ctr, key.len(), CipherMode::Encrypt);
        set_iv(&mut svc, writer, &iv);
        encrypt(&mut svc, writer, &plaintext, 0);

        let cells = device.snapshot(0, plaintext.len());
        prop_assert_ne!(cells, plaintext);
    }
}
