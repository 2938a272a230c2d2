use tokio::sync::Mutex;

/// Round-robin selector over a fixed set of outbound routes.
///
/// The cursor is the only mutable state and sits behind a single async mutex,
/// so concurrent callers each get the next entry in turn.
pub struct ProxyRotator<T> {
    entries: Vec<T>,
    cursor: Mutex<usize>,
}

impl<T> ProxyRotator<T> {
    pub fn new(entries: Vec<T>) -> Self {
        Self {
            entries,
            cursor: Mutex::new(0),
        }
    }

    /// Next entry in rotation, `None` when the rotator is empty.
    pub async fn next(&self) -> Option<&T> {
        if self.entries.is_empty() {
            return None;
        }

        let mut cursor = self.cursor.lock().await;
        let index = *cursor;
        *cursor = (index + 1) % self.entries.len();

        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
