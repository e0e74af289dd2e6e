use std::sync::mpsc::{Receiver, TryRecvError};

use tracing::debug;

/// Check whether an abort has been requested on the channel.
///
/// We use a regular mpsc channel here as the check is non-blocking and
/// happens once per loop iteration. A disconnected channel means every
/// handle was dropped without aborting, which is not a request to stop.
pub(crate) fn should_abort(rx: &mut Receiver<()>) -> bool {
    match rx.try_recv() {
        Ok(()) => {
            debug!("Received abort signal");
            true
        }
        Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn test_should_not_abort() {
        let (_tx, mut rx) = mpsc::channel();
        assert!(!should_abort(&mut rx));
    }

    #[test]
    fn test_should_abort_signal() {
        let (tx, mut rx) = mpsc::channel();
        tx.send(()).unwrap();
        assert!(should_abort(&mut rx));
    }

    #[test]
    fn test_dropped_sender_is_not_abort() {
        // tx is dropped here
        let (_, mut rx) = mpsc::channel::<()>();
        assert!(!should_abort(&mut rx));
    }
}
