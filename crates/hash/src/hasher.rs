//! Running digest accumulators

/// Incremental digest accumulator
///
/// Chunks are fed with [`Hasher::update`]; [`Hasher::finalize`] consumes the
/// accumulator and returns the raw digest bytes.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self: Box<Self>) -> Vec<u8>;
}

/// Accumulator for any RustCrypto digest (SHA-1, SHA-2, MD5)
pub struct RustCryptoHasher<D>(D);

impl<D: sha2::Digest> RustCryptoHasher<D> {
    #[must_use]
    pub fn new() -> Self {
        Self(D::new())
    }
}

impl<D: sha2::Digest> Default for RustCryptoHasher<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: sha2::Digest + Send> Hasher for RustCryptoHasher<D> {
    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.0.finalize().to_vec()
    }
}

/// BLAKE3 accumulator
#[derive(Default)]
pub struct Blake3Hasher(blake3::Hasher);

impl Blake3Hasher {
    #[must_use]
    pub fn new() -> Self {
        Self(blake3::Hasher::new())
    }
}

impl Hasher for Blake3Hasher {
    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.0.finalize().as_bytes().to_vec()
    }
}
