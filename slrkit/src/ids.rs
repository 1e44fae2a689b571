
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("no identifier has been taken from this source yet")]
    NothingTaken,
}

/*
 * A monotonic source of identifiers.
 *
 * Each builder owns its own source, so two builds never
 * share numbering. A bounded source wraps around to 0
 * after handing out `limit - 1`.
 */
#[derive(Debug, Clone)]
pub struct IdSource {
    next: usize,
    limit: Option<usize>,
    last: Option<usize>,
}

impl IdSource {
    pub fn new() -> IdSource {
        IdSource {
            next: 0,
            limit: None,
            last: None,
        }
    }

    pub fn bounded(limit: usize) -> IdSource {
        assert!(limit > 0, "A bounded id source needs room for at least one id.");
        IdSource {
            next: 0,
            limit: Some(limit),
            last: None,
        }
    }

    pub fn take(&mut self) -> usize {
        let id = self.next;
        self.next = match self.limit {
            Some(limit) if id + 1 == limit => 0,
            _ => id + 1,
        };
        self.last = Some(id);
        id
    }

    /*
     * Returns the last id handed out by `take`.
     */
    pub fn peek(&self) -> Result<usize, IdError> {
        self.last.ok_or(IdError::NothingTaken)
    }

    /*
     * The id the next call to `take` will return. For an unbounded
     * source this is also the number of ids taken so far.
     */
    pub fn upcoming(&self) -> usize {
        self.next
    }
}

impl Default for IdSource {
    fn default() -> Self {
        IdSource::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_before_take_fails() {
        let ids = IdSource::new();
        assert_eq!(ids.peek(), Err(IdError::NothingTaken));
    }

    #[test]
    fn take_is_monotonic() {
        let mut ids = IdSource::new();
        assert_eq!(ids.take(), 0);
        assert_eq!(ids.take(), 1);
        assert_eq!(ids.peek(), Ok(1));
        assert_eq!(ids.take(), 2);
        assert_eq!(ids.upcoming(), 3);
    }

    #[test]
    fn bounded_wraps_around() {
        let mut ids = IdSource::bounded(3);
        let taken: Vec<usize> = (0..7).map(|_| ids.take()).collect();
        assert_eq!(taken, vec![0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(ids.peek(), Ok(0));
    }
}
