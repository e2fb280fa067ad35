//! Recognition session pool.
//!
//! A fixed number of engine sessions sit behind two semaphores:
//!
//! - `admission` bounds how many requests may be in the pool at all
//!   (running plus waiting). It is tried, never awaited, so excess load fails
//!   fast with [`LectorError::Overloaded`].
//! - `sessions` has one permit per idle session. tokio semaphores are fair,
//!   so admitted requests are served in the order they started waiting.
//!
//! A session and both permits move into the blocking task that runs the
//! engine. The task hands the session back when the engine returns, so a
//! caller that times out or is dropped can never strand a session in `Busy`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};
use tracing::{debug, error, info, warn};

use crate::config::OcrConfig;
use crate::error::{LectorError, Result};

use super::engine::{EngineFactory, RecognitionEngine};
use super::types::RecognitionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Ready,
    Busy,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Initializing,
    Running,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub pool_size: usize,
    pub max_queue_depth: usize,
    pub timeout: Duration,
}

impl From<&OcrConfig> for PoolSettings {
    fn from(config: &OcrConfig) -> Self {
        Self {
            pool_size: config.pool_size.max(1),
            max_queue_depth: config.max_queue_depth,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

type Session = Box<dyn RecognitionEngine>;

struct PoolInner {
    factory: Arc<dyn EngineFactory>,
    settings: PoolSettings,
    lifecycle: Mutex<Lifecycle>,
    idle: Mutex<Vec<Session>>,
    live: AtomicUsize,
    sessions: Arc<Semaphore>,
    admission: Arc<Semaphore>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PoolInner {
    fn capacity(&self) -> usize {
        self.settings.pool_size + self.settings.max_queue_depth
    }

    fn put_idle(&self, session: Session) {
        lock(&self.idle).push(session);
    }

    fn take_idle(&self) -> Option<Session> {
        lock(&self.idle).pop()
    }

    /// Drop a session slot for good after it could not be rebuilt.
    fn retire_slot(&self) {
        let remaining = self.live.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        error!(remaining, "OCR session retired");
        if remaining == 0 {
            self.sessions.close();
        }
    }
}

/// Exclusive use of one session inside the blocking task.
struct Lease {
    inner: Arc<PoolInner>,
    session: Option<Session>,
    session_permit: Option<OwnedSemaphorePermit>,
    _admission: OwnedSemaphorePermit,
}

impl Lease {
    /// Replace a session whose engine panicked. If the factory cannot build a
    /// new one, the slot is retired along with its permit.
    fn recycle(&mut self) {
        drop(self.session.take());

        let rebuilt = panic::catch_unwind(AssertUnwindSafe(|| self.inner.factory.create()))
            .unwrap_or_else(|payload| {
                Err(LectorError::Engine(format!(
                    "OCR session factory panicked: {}",
                    panic_message(payload.as_ref())
                )))
            });

        match rebuilt {
            Ok(fresh) => {
                info!("OCR session rebuilt");
                self.session = Some(fresh);
            }
            Err(e) => {
                error!(error = %e, "Failed to rebuild OCR session");
                if let Some(permit) = self.session_permit.take() {
                    permit.forget();
                }
                self.inner.retire_slot();
            }
        }
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            self.inner.put_idle(session);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Owns the engine sessions. Cheap to clone; clones share the same pool.
#[derive(Clone)]
pub struct SessionPool {
    inner: Arc<PoolInner>,
}

impl SessionPool {
    pub fn new(factory: Arc<dyn EngineFactory>, settings: PoolSettings) -> Self {
        let settings = PoolSettings {
            pool_size: settings.pool_size.max(1),
            ..settings
        };
        let capacity = settings.pool_size + settings.max_queue_depth;

        Self {
            inner: Arc::new(PoolInner {
                factory,
                settings,
                lifecycle: Mutex::new(Lifecycle::Uninitialized),
                idle: Mutex::new(Vec::with_capacity(settings.pool_size)),
                live: AtomicUsize::new(0),
                sessions: Arc::new(Semaphore::new(0)),
                admission: Arc::new(Semaphore::new(capacity)),
            }),
        }
    }

    pub fn from_config(factory: Arc<dyn EngineFactory>, config: &OcrConfig) -> Self {
        Self::new(factory, PoolSettings::from(config))
    }

    /// Create every session. Must complete before requests are routed here;
    /// an error means the service cannot start.
    pub async fn initialize(&self) -> Result<()> {
        {
            let mut lifecycle = lock(&self.inner.lifecycle);
            if *lifecycle != Lifecycle::Uninitialized {
                return Err(LectorError::Internal(format!(
                    "OCR session pool cannot initialize from state {:?}",
                    *lifecycle
                )));
            }
            *lifecycle = Lifecycle::Initializing;
        }

        let size = self.inner.settings.pool_size;
        let factory = Arc::clone(&self.inner.factory);
        info!(engine = factory.name(), size, "Initializing OCR sessions");

        let created = tokio::task::spawn_blocking(move || {
            (0..size).map(|_| factory.create()).collect::<Result<Vec<_>>>()
        })
        .await
        .map_err(|e| LectorError::Engine(format!("OCR session initialization panicked: {e}")))
        .and_then(|r| r);

        // Commit under the lifecycle lock: a shutdown that ran while the
        // engines were being built must win.
        let mut lifecycle = lock(&self.inner.lifecycle);
        if *lifecycle != Lifecycle::Initializing {
            drop(lifecycle);
            drop(created);
            warn!("OCR pool shut down during initialization, discarding sessions");
            return Err(LectorError::Unavailable(
                "OCR engine has shut down".to_string(),
            ));
        }

        match created {
            Ok(sessions) => {
                lock(&self.inner.idle).extend(sessions);
                self.inner.live.store(size, Ordering::SeqCst);
                self.inner.sessions.add_permits(size);
                *lifecycle = Lifecycle::Running;
                info!(
                    size,
                    queue_depth = self.inner.settings.max_queue_depth,
                    "OCR sessions ready"
                );
                Ok(())
            }
            Err(e) => {
                *lifecycle = Lifecycle::Uninitialized;
                error!(error = %e, "OCR session initialization failed");
                Err(e)
            }
        }
    }

    /// Run one recognition on the next free session.
    pub async fn recognize(&self, image: Vec<u8>) -> Result<RecognitionResult> {
        self.ensure_running()?;

        let admission = match Arc::clone(&self.inner.admission).try_acquire_owned() {
            Ok(permit) => permit,
            Err(TryAcquireError::NoPermits) => {
                warn!(capacity = self.capacity(), "OCR pool overloaded, rejecting request");
                return Err(LectorError::Overloaded {
                    capacity: self.capacity(),
                });
            }
            Err(TryAcquireError::Closed) => {
                return Err(LectorError::Unavailable("OCR engine has shut down".to_string()));
            }
        };

        let timeout = self.inner.settings.timeout;
        match tokio::time::timeout(timeout, self.run(image, admission)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs(), "OCR request timed out");
                Err(LectorError::Timeout {
                    secs: timeout.as_secs(),
                })
            }
        }
    }

    async fn run(
        &self,
        image: Vec<u8>,
        admission: OwnedSemaphorePermit,
    ) -> Result<RecognitionResult> {
        let session_permit = Arc::clone(&self.inner.sessions)
            .acquire_owned()
            .await
            .map_err(|_| LectorError::Unavailable("no OCR sessions left".to_string()))?;

        let Some(session) = self.inner.take_idle() else {
            session_permit.forget();
            return Err(LectorError::Internal(
                "OCR session permit granted with no idle session".to_string(),
            ));
        };

        debug!(bytes = image.len(), "Dispatching recognition");
        let inner = Arc::clone(&self.inner);

        tokio::task::spawn_blocking(move || {
            let mut lease = Lease {
                inner,
                session: Some(session),
                session_permit: Some(session_permit),
                _admission: admission,
            };
            let Some(engine) = lease.session.as_mut() else {
                return Err(LectorError::Internal("lease lost its session".to_string()));
            };

            match panic::catch_unwind(AssertUnwindSafe(|| engine.recognize(&image))) {
                Ok(result) => result,
                Err(payload) => {
                    let message = panic_message(payload.as_ref()).to_string();
                    warn!(panic = %message, "OCR session panicked during recognition, recycling");
                    lease.recycle();
                    Err(LectorError::Engine(format!("OCR engine panicked: {message}")))
                }
            }
        })
        .await
        .map_err(|e| LectorError::Engine(format!("OCR task panicked: {e}")))?
    }

    /// Stop admitting requests, wait for everything admitted to finish, then
    /// release every session. Later calls return immediately.
    pub async fn shutdown(&self) {
        {
            let mut lifecycle = lock(&self.inner.lifecycle);
            if *lifecycle == Lifecycle::Terminated {
                return;
            }
            *lifecycle = Lifecycle::Terminated;
        }

        info!(in_flight = self.in_flight(), "Shutting down OCR sessions");

        let capacity = u32::try_from(self.capacity()).unwrap_or(u32::MAX);
        match self.inner.admission.acquire_many(capacity).await {
            Ok(permits) => permits.forget(),
            Err(_) => warn!("OCR admission already closed during shutdown"),
        }
        self.inner.admission.close();
        self.inner.sessions.close();

        let released = std::mem::take(&mut *lock(&self.inner.idle));
        let count = released.len();
        drop(released);
        self.inner.live.store(0, Ordering::SeqCst);
        info!(released = count, "OCR sessions released");
    }

    fn ensure_running(&self) -> Result<()> {
        match *lock(&self.inner.lifecycle) {
            Lifecycle::Running => Ok(()),
            Lifecycle::Terminated => Err(LectorError::Unavailable(
                "OCR engine has shut down".to_string(),
            )),
            Lifecycle::Uninitialized | Lifecycle::Initializing => Err(LectorError::Unavailable(
                "OCR engine is not initialized".to_string(),
            )),
        }
    }

    pub fn state(&self) -> SessionState {
        match *lock(&self.inner.lifecycle) {
            Lifecycle::Uninitialized => SessionState::Uninitialized,
            Lifecycle::Initializing => SessionState::Initializing,
            Lifecycle::Terminated => SessionState::Terminated,
            Lifecycle::Running if self.in_flight() > 0 => SessionState::Busy,
            Lifecycle::Running => SessionState::Ready,
        }
    }

    /// Sessions currently running a recognition.
    pub fn in_flight(&self) -> usize {
        let live = self.inner.live.load(Ordering::SeqCst);
        live.saturating_sub(lock(&self.inner.idle).len())
    }

    /// Live sessions in the pool.
    pub fn size(&self) -> usize {
        self.inner.live.load(Ordering::SeqCst)
    }

    /// Requests the pool accepts at once, running plus queued.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn engine_name(&self) -> &str {
        self.inner.factory.name()
    }
}
