use chrono::{
    DateTime,
    Local,
};
use std::time::{
    Duration,
    Instant,
};

pub const SUCCESS_TTL: Duration = Duration::from_secs(4);
pub const FAILURE_TTL: Duration = Duration::from_secs(6);
pub const MAX_VISIBLE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoticeId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Pending,
    Success,
    Failure,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub id: NoticeId,
    pub kind: NoticeKind,
    pub message: String,
    /// Wall-clock time of the last change, for display.
    pub at: DateTime<Local>,
    since: Instant,
}

impl Notice {
    fn expired_at(&self, now: Instant) -> bool {
        let ttl = match self.kind {
            NoticeKind::Pending => return false,
            NoticeKind::Success => SUCCESS_TTL,
            NoticeKind::Failure => FAILURE_TTL,
        };
        now.duration_since(self.since) >= ttl
    }
}

/// Transient status messages. A pending notice stays until resolved;
/// resolved ones fade after their TTL.
#[derive(Debug, Default)]
pub struct Notifications {
    next_id: u64,
    notices: Vec<Notice>,
}

impl Notifications {
    pub fn pending(&mut self, message: impl Into<String>) -> NoticeId {
        self.push(NoticeKind::Pending, message.into(), Instant::now())
    }

    pub fn push_success(&mut self, message: impl Into<String>) -> NoticeId {
        self.push(NoticeKind::Success, message.into(), Instant::now())
    }

    pub fn push_failure(&mut self, message: impl Into<String>) -> NoticeId {
        self.push(NoticeKind::Failure, message.into(), Instant::now())
    }

    /// Turn a pending notice into a success or failure. Unknown ids post a
    /// fresh notice so no outcome is lost.
    pub fn resolve(&mut self, id: NoticeId, outcome: Result<String, String>) {
        let (kind, message) = match outcome {
            Ok(message) => (NoticeKind::Success, message),
            Err(message) => (NoticeKind::Failure, message),
        };
        let now = Instant::now();
        match self.notices.iter_mut().find(|n| n.id == id) {
            Some(notice) => {
                notice.kind = kind;
                notice.message = message;
                notice.at = Local::now();
                notice.since = now;
            }
            None => {
                self.push(kind, message, now);
            }
        }
    }

    fn push(&mut self, kind: NoticeKind, message: String, now: Instant) -> NoticeId {
        let id = NoticeId(self.next_id);
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            kind,
            message,
            at: Local::now(),
            since: now,
        });
        id
    }

    pub fn prune(&mut self, now: Instant) {
        self.notices.retain(|n| !n.expired_at(now));
    }

    /// Live notices, newest first, capped at [`MAX_VISIBLE`].
    pub fn visible(&self, now: Instant) -> Vec<Notice> {
        self.notices
            .iter()
            .rev()
            .filter(|n| !n.expired_at(now))
            .take(MAX_VISIBLE)
            .cloned()
            .collect()
    }
}
