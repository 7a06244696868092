//! Per-client evaluation sessions for front-ends that keep state between
//! requests (upload, then process, then export).
//!
//! The evaluation core is stateless; a `SessionStore` is owned by the
//! driving layer and keeps at most one (clean, noisy, results) triple per
//! session. Re-running a session replaces the previous triple as a whole.
use crate::error::EvalError;
use crate::evaluation::{EvaluationOptions, EvaluationSummary, Evaluator, FilterResultSet};
use crate::filters::FilterDescriptor;
use crate::image::GrayImageU8;
use crate::noise::NoiseModel;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Opaque session identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("unknown session {0}")]
    UnknownSession(SessionId),
    #[error("session {0} has not been processed yet")]
    NotProcessed(SessionId),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Output of the latest run of a session.
#[derive(Clone, Debug)]
pub struct ProcessedRun {
    pub noise: NoiseModel,
    pub seed: u64,
    pub noisy: GrayImageU8,
    pub results: FilterResultSet,
    pub summary: EvaluationSummary,
}

#[derive(Clone, Debug)]
pub struct Session {
    clean: GrayImageU8,
    run: Option<ProcessedRun>,
}

impl Session {
    pub fn clean(&self) -> &GrayImageU8 {
        &self.clean
    }

    pub fn run(&self) -> Option<&ProcessedRun> {
        self.run.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<SessionId, Session>,
    options: EvaluationOptions,
}

impl SessionStore {
    pub fn new(options: EvaluationOptions) -> Self {
        Self {
            sessions: HashMap::new(),
            options,
        }
    }

    /// Register a clean image and return the handle for later requests.
    pub fn create(&mut self, clean: GrayImageU8) -> SessionId {
        let id = SessionId::new();
        self.sessions.insert(id, Session { clean, run: None });
        debug!("session {id} created");
        id
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn remove(&mut self, id: SessionId) -> Option<Session> {
        self.sessions.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Inject noise into the session's clean image, evaluate `descriptors`
    /// and store the outcome, replacing any earlier run.
    pub fn process(
        &mut self,
        id: SessionId,
        noise: NoiseModel,
        seed: u64,
        descriptors: &[FilterDescriptor],
    ) -> Result<&ProcessedRun, SessionError> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        let mut rng = StdRng::seed_from_u64(seed);
        let noisy = noise
            .apply(session.clean.as_view(), &mut rng)
            .map_err(EvalError::from)?;
        let results = Evaluator::new(self.options).run(
            session.clean.as_view(),
            noisy.as_view(),
            descriptors,
        )?;
        let summary = results.summarize().map_err(EvalError::from)?;
        debug!(
            "session {id}: {} noise, best={} (mse={:.4})",
            noise.name(),
            summary.best.label,
            summary.best.mse
        );
        Ok(session.run.insert(ProcessedRun {
            noise,
            seed,
            noisy,
            results,
            summary,
        }))
    }

    /// Latest run of a session, failing when it was never processed.
    pub fn processed(&self, id: SessionId) -> Result<&ProcessedRun, SessionError> {
        self.sessions
            .get(&id)
            .ok_or(SessionError::UnknownSession(id))?
            .run
            .as_ref()
            .ok_or(SessionError::NotProcessed(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::default_descriptors;
    use crate::noise::SaltPepperParams;

    #[test]
    fn process_stores_a_single_run() {
        let mut store = SessionStore::new(EvaluationOptions { parallel: false });
        let id = store.create(GrayImageU8::from_fn(20, 20, |x, y| ((x + y) * 6) as u8));
        assert_eq!(
            store.processed(id).unwrap_err(),
            SessionError::NotProcessed(id)
        );

        let noise = NoiseModel::SaltPepper(SaltPepperParams::new(0.05, 0.05).unwrap());
        let first_noisy = store
            .process(id, noise, 7, &default_descriptors())
            .unwrap()
            .noisy
            .clone();
        let second = store.process(id, noise, 8, &default_descriptors()).unwrap();
        assert_eq!(second.seed, 8);
        assert_ne!(second.noisy, first_noisy);
        assert_eq!(second.results.len(), 8);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_session_is_reported() {
        let mut store = SessionStore::default();
        let ghost = store.create(GrayImageU8::filled(2, 2, 0));
        store.remove(ghost);
        let err = store
            .process(ghost, NoiseModel::default(), 0, &default_descriptors())
            .unwrap_err();
        assert_eq!(err, SessionError::UnknownSession(ghost));
    }
}
