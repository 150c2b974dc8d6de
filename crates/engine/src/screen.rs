//! Per-screen load status and stale-result guard.

use crate::EngineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenStatus {
    Loading,
    Ready,
    /// Stays until the user retries.
    Error(EngineError),
}

impl ScreenStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn error(&self) -> Option<&EngineError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// Identifies one load request. Only the most recent ticket of a mounted
/// screen may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug)]
pub(crate) struct Screen {
    status: ScreenStatus,
    generation: u64,
    mounted: bool,
}

impl Screen {
    pub(crate) fn new() -> Self {
        Self {
            status: ScreenStatus::Loading,
            generation: 0,
            mounted: true,
        }
    }

    pub(crate) fn status(&self) -> &ScreenStatus {
        &self.status
    }

    pub(crate) fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub(crate) fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        if self.mounted {
            self.status = ScreenStatus::Loading;
        }
        LoadTicket(self.generation)
    }

    pub(crate) fn accepts(&self, ticket: LoadTicket) -> bool {
        self.mounted && ticket.0 == self.generation
    }

    pub(crate) fn ready(&mut self) {
        self.status = ScreenStatus::Ready;
    }

    pub(crate) fn fail(&mut self, err: EngineError) {
        self.status = ScreenStatus::Error(err);
    }

    pub(crate) fn mount(&mut self) {
        self.mounted = true;
    }

    /// Invalidates every ticket handed out so far.
    pub(crate) fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
    }
}
