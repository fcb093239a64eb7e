use anyhow::Result;

/// Everything runs on a single thread, there is no work that would benefit from more.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
