//! The stateful cipher engine.
//!
//! One engine per prepared session. Configuration (algorithm, direction,
//! key size) is fixed at allocation; key material and the running stream
//! are the mutable state, governed by the key-state machine described in
//! the crate docs.

use aes::{
    Aes128, Aes256,
    cipher::{
        BlockDecryptMut, BlockEncryptMut, BlockSizeUser, KeyInit, KeyIvInit, StreamCipher,
        consts::U16, generic_array::GenericArray,
    },
};

use crate::{
    error::EngineError,
    key::KeyMaterial,
    selector::{Algorithm, BLOCK_SIZE, CipherMode, KeySize},
};

type Ctr128<C> = ctr::Ctr128BE<C>;

/// Provenance of bound key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    /// The all-zero placeholder installed at allocation.
    Bootstrap,
    /// Key material loaded from the sealed store.
    Real,
}

/// Key state of the engine. See the crate docs for the transition diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// No key has ever been bound.
    Unkeyed,
    /// Keyed with the all-zero bootstrap placeholder. Untrusted for secrecy.
    Bootstrap,
    /// Keyed with sealed key material.
    Real,
}

/// Running stream state, created by `init` and consumed by `update`.
///
/// Chaining (CBC) and counter (CTR) state lives inside the mode wrappers
/// and persists across `update` calls. CTR encrypt and decrypt are the same
/// keystream application, so one variant covers both directions.
enum StreamState {
    EcbEnc128(ecb::Encryptor<Aes128>),
    EcbDec128(ecb::Decryptor<Aes128>),
    EcbEnc256(ecb::Encryptor<Aes256>),
    EcbDec256(ecb::Decryptor<Aes256>),
    CbcEnc128(cbc::Encryptor<Aes128>),
    CbcDec128(cbc::Decryptor<Aes128>),
    CbcEnc256(cbc::Encryptor<Aes256>),
    CbcDec256(cbc::Decryptor<Aes256>),
    Ctr128(Ctr128<Aes128>),
    Ctr256(Ctr128<Aes256>),
}

/// Stateful AES transform resource.
///
/// Owns its key container: dropping the engine releases the stream state
/// and zeroizes the bound key. There is no handle pair to keep consistent
/// at this level.
pub struct CipherEngine {
    algorithm: Algorithm,
    mode: CipherMode,
    key_size: KeySize,
    key: Option<KeyMaterial>,
    key_state: KeyState,
    stream: Option<StreamState>,
}

impl CipherEngine {
    /// Allocate an engine for the given configuration.
    ///
    /// The engine starts `Unkeyed` and cannot be reset or initialized until
    /// a first key is bound.
    pub fn allocate(algorithm: Algorithm, mode: CipherMode, key_size: KeySize) -> Self {
        Self { algorithm, mode, key_size, key: None, key_state: KeyState::Unkeyed, stream: None }
    }

    /// Configured chaining flavour.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Configured transform direction.
    pub fn mode(&self) -> CipherMode {
        self.mode
    }

    /// Configured key size.
    pub fn key_size(&self) -> KeySize {
        self.key_size
    }

    /// Current key state.
    pub fn key_state(&self) -> KeyState {
        self.key_state
    }

    /// Whether a stream has been initialized and not reset since.
    pub fn stream_active(&self) -> bool {
        self.stream.is_some()
    }

    /// Return the engine to its initial (stream-less) state.
    ///
    /// # Errors
    ///
    /// - `NoKeyBound`: the engine has never been keyed. An unkeyed engine
    ///   has no initial state to return to.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        if self.key.is_none() {
            return Err(EngineError::NoKeyBound);
        }
        self.stream = None;
        Ok(())
    }

    /// Bind key material, replacing any previous key.
    ///
    /// The first bind (from `Unkeyed`) installs the key directly. Every
    /// later bind runs the mandatory reset-then-set sequence, discarding
    /// any running stream.
    ///
    /// # Errors
    ///
    /// - `KeyLengthMismatch`: material length does not match the configured
    ///   key size. The previous key, if any, stays bound.
    pub fn set_key(&mut self, key: KeyMaterial, class: KeyClass) -> Result<(), EngineError> {
        if key.len() != self.key_size.bytes() {
            return Err(EngineError::KeyLengthMismatch {
                expected: self.key_size.bytes(),
                got: key.len(),
            });
        }

        if self.key.is_some() {
            self.reset()?;
        }

        self.key = Some(key);
        self.key_state = match class {
            KeyClass::Bootstrap => KeyState::Bootstrap,
            KeyClass::Real => KeyState::Real,
        };
        Ok(())
    }

    /// Start (or restart) the running stream at the given IV.
    ///
    /// Does not touch the key. ECB ignores the IV content but the length
    /// requirement is enforced uniformly.
    ///
    /// # Errors
    ///
    /// - `NoKeyBound`: no key has been bound yet.
    /// - `IvLengthMismatch`: IV length is not the block size.
    pub fn init(&mut self, iv: &[u8]) -> Result<(), EngineError> {
        let Some(key) = &self.key else {
            return Err(EngineError::NoKeyBound);
        };
        if iv.len() != BLOCK_SIZE {
            return Err(EngineError::IvLengthMismatch { expected: BLOCK_SIZE, got: iv.len() });
        }

        self.stream =
            Some(StreamState::build(self.algorithm, self.mode, self.key_size, key, iv)?);
        Ok(())
    }

    /// Transform `input` into `output`, returning the produced length.
    ///
    /// Always produces exactly `input.len()` bytes (no padding). Chaining
    /// state advances, so consecutive calls continue the same stream.
    ///
    /// # Errors
    ///
    /// - `NotBlockAligned`: ECB/CBC input not a multiple of the block size.
    /// - `ShortOutput`: output slice smaller than the input.
    /// - `StreamNotInitialized`: `init` has not been called since the last
    ///   reset or key change.
    pub fn update(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, EngineError> {
        if self.algorithm.requires_block_alignment() && !input.len().is_multiple_of(BLOCK_SIZE) {
            return Err(EngineError::NotBlockAligned { len: input.len(), block: BLOCK_SIZE });
        }
        if output.len() < input.len() {
            return Err(EngineError::ShortOutput { needed: input.len(), have: output.len() });
        }
        let Some(stream) = &mut self.stream else {
            return Err(EngineError::StreamNotInitialized);
        };

        let output = &mut output[..input.len()];
        output.copy_from_slice(input);
        stream.transform_in_place(output);
        Ok(input.len())
    }
}

fn invalid_key(key_size: KeySize, got: usize) -> EngineError {
    EngineError::KeyLengthMismatch { expected: key_size.bytes(), got }
}

impl StreamState {
    /// Instantiate the mode wrapper for one stream.
    ///
    /// Key and IV lengths are validated by the callers; the `map_err`s here
    /// cannot fire in practice but keep this path panic-free.
    fn build(
        algorithm: Algorithm,
        mode: CipherMode,
        key_size: KeySize,
        key: &KeyMaterial,
        iv: &[u8],
    ) -> Result<Self, EngineError> {
        let k = key.as_bytes();
        let bad = || invalid_key(key_size, k.len());

        Ok(match (algorithm, mode, key_size) {
            (Algorithm::Ecb, CipherMode::Encrypt, KeySize::Aes128) => {
                Self::EcbEnc128(ecb::Encryptor::new_from_slice(k).map_err(|_| bad())?)
            },
            (Algorithm::Ecb, CipherMode::Decrypt, KeySize::Aes128) => {
                Self::EcbDec128(ecb::Decryptor::new_from_slice(k).map_err(|_| bad())?)
            },
            (Algorithm::Ecb, CipherMode::Encrypt, KeySize::Aes256) => {
                Self::EcbEnc256(ecb::Encryptor::new_from_slice(k).map_err(|_| bad())?)
            },
            (Algorithm::Ecb, CipherMode::Decrypt, KeySize::Aes256) => {
                Self::EcbDec256(ecb::Decryptor::new_from_slice(k).map_err(|_| bad())?)
            },
            (Algorithm::Cbc, CipherMode::Encrypt, KeySize::Aes128) => {
                Self::CbcEnc128(cbc::Encryptor::new_from_slices(k, iv).map_err(|_| bad())?)
            },
            (Algorithm::Cbc, CipherMode::Decrypt, KeySize::Aes128) => {
                Self::CbcDec128(cbc::Decryptor::new_from_slices(k, iv).map_err(|_| bad())?)
            },
            (Algorithm::Cbc, CipherMode::Encrypt, KeySize::Aes256) => {
                Self::CbcEnc256(cbc::Encryptor::new_from_slices(k, iv).map_err(|_| bad())?)
            },
            (Algorithm::Cbc, CipherMode::Decrypt, KeySize::Aes256) => {
                Self::CbcDec256(cbc::Decryptor::new_from_slices(k, iv).map_err(|_| bad())?)
            },
            (Algorithm::Ctr, _, KeySize::Aes128) => {
                Self::Ctr128(Ctr128::new_from_slices(k, iv).map_err(|_| bad())?)
            },
            (Algorithm::Ctr, _, KeySize::Aes256) => {
                Self::Ctr256(Ctr128::new_from_slices(k, iv).map_err(|_| bad())?)
            },
        })
    }

    /// Transform a block-aligned (ECB/CBC) or arbitrary (CTR) buffer in
    /// place, advancing chaining/counter state.
    fn transform_in_place(&mut self, buf: &mut [u8]) {
        match self {
            Self::EcbEnc128(c) => encrypt_blocks(c, buf),
            Self::EcbDec128(c) => decrypt_blocks(c, buf),
            Self::EcbEnc256(c) => encrypt_blocks(c, buf),
            Self::EcbDec256(c) => decrypt_blocks(c, buf),
            Self::CbcEnc128(c) => encrypt_blocks(c, buf),
            Self::CbcDec128(c) => decrypt_blocks(c, buf),
            Self::CbcEnc256(c) => encrypt_blocks(c, buf),
            Self::CbcDec256(c) => decrypt_blocks(c, buf),
            Self::Ctr128(c) => c.apply_keystream(buf),
            Self::Ctr256(c) => c.apply_keystream(buf),
        }
    }
}

fn encrypt_blocks<C>(cipher: &mut C, buf: &mut [u8])
where
    C: BlockEncryptMut + BlockSizeUser<BlockSize = U16>,
{
    debug_assert!(buf.len().is_multiple_of(BLOCK_SIZE));
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        cipher.encrypt_block_mut(GenericArray::from_mut_slice(block));
    }
}

fn decrypt_blocks<C>(cipher: &mut C, buf: &mut [u8])
where
    C: BlockDecryptMut + BlockSizeUser<BlockSize = U16>,
{
    debug_assert!(buf.len().is_multiple_of(BLOCK_SIZE));
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        cipher.decrypt_block_mut(GenericArray::from_mut_slice(block));
    }
}
