// SPDX-License-Identifier: GPL-3.0-only

//! Transient user notifications
//!
//! The actual toast surface lives outside this crate; the flow only talks to
//! this trait. Every user-facing error becomes one of these notices and a
//! recovery transition, never a crash.

use tracing::{info, warn};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Receiver of transient, non-blocking notices
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Default notifier that writes notices to the log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Info => info!(notice = message, "User notice"),
            NoticeKind::Error => warn!(notice = message, "User notice"),
        }
    }
}
