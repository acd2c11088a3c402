use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};

use super::{Params, ScreenId};

/// A navigation request made by a screen.
///
/// There is no reset variant; only the bottom navigation may
/// replace the stack.
#[derive(Debug, Clone, PartialEq)]
pub enum NavRequest {
    Push {
        screen: ScreenId,
        title: String,
        params: Params,
    },
    Back,
    ForceUpdate,
    Logout,
}

/// Handle given to mounted screens.
///
/// Every call is fire-and-forget: requests are queued and applied by the
/// owning session in call order after the current event has been handled.
#[derive(Debug, Clone)]
pub struct Navigator {
    tx: UnboundedSender<NavRequest>,
}

/// Receiving half, owned by the session
#[derive(Debug)]
pub struct NavQueue {
    rx: UnboundedReceiver<NavRequest>,
}

impl Navigator {
    pub fn channel() -> (Navigator, NavQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Navigator { tx }, NavQueue { rx })
    }

    fn send(&self, request: NavRequest) {
        // The session may already be gone (e.g. after logout); that is fine.
        if self.tx.send(request).is_err() {
            log::debug!("Dropping navigation request, session closed");
        }
    }

    pub fn navigate_to(&self, screen: ScreenId, title: impl Into<String>, params: impl Into<Params>) {
        self.send(NavRequest::Push {
            screen,
            title: title.into(),
            params: params.into(),
        });
    }

    pub fn handle_back(&self) {
        self.send(NavRequest::Back);
    }

    pub fn force_update(&self) {
        self.send(NavRequest::ForceUpdate);
    }

    pub fn logout(&self) {
        self.send(NavRequest::Logout);
    }
}

impl NavQueue {
    /// Take every queued request, oldest first
    pub fn drain(&mut self) -> Vec<NavRequest> {
        let mut requests = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(request) => requests.push(request),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_requests_keep_call_order() {
        let (nav, mut queue) = Navigator::channel();
        nav.navigate_to(ScreenId::StudentList, "Students", json!({"a": 1}));
        nav.navigate_to(ScreenId::StudentList, "Students", json!({"a": 2}));
        nav.handle_back();
        nav.force_update();

        let drained = queue.drain();
        assert_eq!(drained.len(), 4);
        assert!(matches!(&drained[0], NavRequest::Push { params, .. } if params.get_i64("a") == Some(1)));
        assert!(matches!(&drained[1], NavRequest::Push { params, .. } if params.get_i64("a") == Some(2)));
        assert_eq!(drained[2], NavRequest::Back);
        assert_eq!(drained[3], NavRequest::ForceUpdate);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_send_after_queue_dropped_is_silent() {
        let (nav, queue) = Navigator::channel();
        drop(queue);
        nav.navigate_to(ScreenId::Fees, "Fees", Params::new());
        nav.logout();
    }
}
