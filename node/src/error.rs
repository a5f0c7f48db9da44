use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("store error: {0}")]
    Store(#[from] attest_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] attest_store_lmdb::LmdbError),

    #[error("runtime error: {0}")]
    Runtime(#[from] attest_runtime::RuntimeError),

    #[error("database is corrupted: {0}")]
    Corruption(String),

    #[error("config error: {0}")]
    Config(String),
}
