use std::thread;

/// Spawns a detached background thread named `homescreen-<name>`.
///
/// Spawn failures are logged rather than propagated; callers treat the
/// background work as best-effort.
pub fn spawn_named_thread<F>(name: &str, task: F)
where F: FnOnce() + Send + 'static {
    let thread_name = format!("homescreen-{name}");

    if let Err(err) = thread::Builder::new().name(thread_name.clone()).spawn(task) {
        tracing::error!(thread = %thread_name, error = %err, "failed to spawn thread");
    }
}
