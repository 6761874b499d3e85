use once_cell::sync::Lazy;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub static RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime")
});

pub fn spawn_async<F>(fut: F) -> JoinHandle<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    RUNTIME.spawn(fut)
}

/// Runs `fut` on the shared runtime and hands the result to `on_done` on the
/// GTK main loop. Must be called from the main thread.
pub fn run_async_to_main<T, Fut, F>(fut: Fut, on_done: F)
where
    T: Send + 'static,
    Fut: std::future::Future<Output = T> + Send + 'static,
    F: FnOnce(T) + 'static,
{
    let (tx, rx) = oneshot::channel::<T>();
    spawn_async(async move {
        let _ = tx.send(fut.await);
    });
    glib::spawn_future_local(async move {
        match rx.await {
            Ok(res) => on_done(res),
            Err(_) => log::error!("background task dropped before completing"),
        }
    });
}

/// Adds `http://` when no scheme is given and strips trailing slashes.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    let rounded = (size * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
