use std::sync::Arc;

/// A callable registered against a provider.
/// Supports both payload jobs (receive the trigger arguments) and notify-only jobs.
pub enum Job<A = ()> {
    /// Receives a clone of the trigger arguments
    Payload(Arc<dyn Fn(A) + Send + Sync + 'static>),
    /// Only learns that a trigger happened
    NotifyOnly(Arc<dyn Fn() + Send + Sync + 'static>),
}

impl<A> Clone for Job<A> {
    fn clone(&self) -> Self {
        match self {
            Job::Payload(f) => Job::Payload(f.clone()),
            Job::NotifyOnly(f) => Job::NotifyOnly(f.clone()),
        }
    }
}

impl<A> Job<A> {
    pub fn call(&self, args: A) {
        match self {
            Job::Payload(f) => f(args),
            Job::NotifyOnly(f) => f(),
        }
    }
}

impl<A> std::fmt::Debug for Job<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Job::Payload(_) => f.write_str("Job::Payload"),
            Job::NotifyOnly(_) => f.write_str("Job::NotifyOnly"),
        }
    }
}

/// Trait for types that can be subscribed to a provider as a job.
pub trait IntoJob<A> {
    fn into_job(self) -> Job<A>;
}

impl<F, A> IntoJob<A> for F
where F: Fn(A) + Send + Sync + 'static
{
    fn into_job(self) -> Job<A> { Job::Payload(Arc::new(self)) }
}

impl<A> IntoJob<A> for Job<A> {
    fn into_job(self) -> Job<A> { self }
}

impl<A> IntoJob<A> for Arc<dyn Fn(A) + Send + Sync + 'static> {
    fn into_job(self) -> Job<A> { Job::Payload(self) }
}

// Unit jobs work with any payload type, the arguments are simply not forwarded
impl<A> IntoJob<A> for Arc<dyn Fn() + Send + Sync + 'static> {
    fn into_job(self) -> Job<A> { Job::NotifyOnly(self) }
}

impl<A> IntoJob<A> for std::sync::mpsc::Sender<A>
where A: Send + 'static
{
    fn into_job(self) -> Job<A> {
        Job::Payload(Arc::new(move |args| {
            let _ = self.send(args); // receiver gone, nothing to deliver
        }))
    }
}

#[cfg(feature = "tokio")]
impl<A> IntoJob<A> for tokio::sync::mpsc::UnboundedSender<A>
where A: Send + 'static
{
    fn into_job(self) -> Job<A> {
        Job::Payload(Arc::new(move |args| {
            let _ = self.send(args);
        }))
    }
}
