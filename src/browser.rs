/// Try to open `url` in the default browser. Failure is never fatal; the URL
/// has already been printed for the user.
pub fn open_best_effort(url: &str) -> bool {
    match webbrowser::open(url) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("ignoring browser launch failure: {e}");
            false
        }
    }
}
