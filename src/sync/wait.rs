//! Optional bounds on blocking waits.
//!
//! Production waits are unbounded, matching the reference system. A
//! [`WaitBound::Within`] lets tests (and cautious deployments) turn a stalled
//! producer or consumer into a reported timeout instead of a silent stall.

use core::future::Future;

use embassy_time::{Duration, TimeoutError, with_timeout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitBound {
    #[default]
    Forever,
    Within(Duration),
}

impl WaitBound {
    /// `None` → wait forever; `Some(ms)` → bounded.
    pub fn from_millis(ms: Option<u64>) -> Self {
        match ms {
            Some(ms) => Self::Within(Duration::from_millis(ms)),
            None => Self::Forever,
        }
    }
}

/// Run `fut` under `bound`.
pub async fn bounded<F: Future>(bound: WaitBound, fut: F) -> Result<F::Output, TimeoutError> {
    match bound {
        WaitBound::Forever => Ok(fut.await),
        WaitBound::Within(limit) => with_timeout(limit, fut).await,
    }
}
