use zeroize::Zeroizing;

/// Raw hash output, wiped when dropped on every path out of the hasher.
pub struct RawDigest(Zeroizing<Vec<u8>>);

impl RawDigest {
    /// Take ownership of an engine output buffer.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        RawDigest(Zeroizing::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for RawDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RawDigest({} bytes)", self.0.len())
    }
}
