//! Retry loop: run an operation until success, a fatal error, or the last attempt.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use super::classify::RetryClassifier;
use super::error::MissingResponseCode;
use super::policy::{Backoff, RetryBudget};
use super::sleeper::{Sleeper, ThreadSleeper};

/// True if `error` is a known client error whose code is retry-eligible.
fn should_retry<C, E>(classifier: &C, error: &E) -> Result<bool, MissingResponseCode>
where
    C: RetryClassifier<E> + ?Sized,
{
    if !classifier.is_known(error) {
        return Ok(false);
    }
    let code = classifier.response_code(error)?;
    Ok(classifier.is_retryable(&code))
}

fn log_retry<E: fmt::Display>(error: &E, delay: Duration) {
    tracing::info!("{}: Retrying in {} seconds...", error, delay.as_secs_f64());
}

impl Backoff {
    /// Run `op` under this policy, sleeping on the calling thread between attempts.
    ///
    /// Errors the classifier does not recognize, and recognized errors with a
    /// non-retryable code, are returned unchanged after a single attempt. The
    /// final attempt is never retried; its result is returned as-is.
    pub fn execute<C, F, T, E>(&self, classifier: &C, op: F) -> Result<T, E>
    where
        C: RetryClassifier<E> + ?Sized,
        F: FnMut() -> Result<T, E>,
        E: fmt::Display + From<MissingResponseCode>,
    {
        self.execute_with_sleeper(classifier, &ThreadSleeper, op)
    }

    /// Like [`Backoff::execute`] with an explicit sleeper.
    pub fn execute_with_sleeper<C, S, F, T, E>(
        &self,
        classifier: &C,
        sleeper: &S,
        mut op: F,
    ) -> Result<T, E>
    where
        C: RetryClassifier<E> + ?Sized,
        S: Sleeper + ?Sized,
        F: FnMut() -> Result<T, E>,
        E: fmt::Display + From<MissingResponseCode>,
    {
        let mut budget = RetryBudget::new(self);
        while budget.can_retry() {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if !should_retry(classifier, &e)? {
                        return Err(e);
                    }
                    let delay = budget.consume();
                    log_retry(&e, delay);
                    sleeper.sleep(delay);
                }
            }
        }
        op()
    }

    /// Decorate `f` so every call goes through [`Backoff::execute`].
    ///
    /// The wrapper keeps `f`'s signature; its argument is cloned for each
    /// attempt. Use a tuple to pass several arguments.
    pub fn wrap<C, F, A, T, E>(self, classifier: C, f: F) -> impl Fn(A) -> Result<T, E>
    where
        C: RetryClassifier<E>,
        F: Fn(A) -> Result<T, E>,
        A: Clone,
        E: fmt::Display + From<MissingResponseCode>,
    {
        move |args: A| self.execute(&classifier, || f(args.clone()))
    }

    /// Async form of [`Backoff::execute`]: waits with `tokio::time::sleep`
    /// instead of blocking the thread. Ordering and budget are identical.
    pub async fn execute_async<C, F, Fut, T, E>(&self, classifier: &C, mut op: F) -> Result<T, E>
    where
        C: RetryClassifier<E> + ?Sized,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display + From<MissingResponseCode>,
    {
        let mut budget = RetryBudget::new(self);
        while budget.can_retry() {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if !should_retry(classifier, &e)? {
                        return Err(e);
                    }
                    let delay = budget.consume();
                    log_retry(&e, delay);
                    tokio::time::sleep(delay).await;
                }
            }
        }
        op().await
    }
}
