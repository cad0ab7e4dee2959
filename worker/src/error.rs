use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThreadError {
    #[error("failed to spawn thread {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
    /// The thread's callback panicked; the payload message is kept when it was a string
    #[error("thread {name} panicked: {message}")]
    Panicked { name: String, message: String },
}

impl ThreadError {
    pub(crate) fn panicked(name: &str, payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => message.to_string(),
                Err(_) => "non-string panic payload".to_string(),
            },
        };
        ThreadError::Panicked { name: name.to_string(), message }
    }

    pub fn name(&self) -> &str {
        match self {
            ThreadError::Spawn { name, .. } | ThreadError::Panicked { name, .. } => name,
        }
    }
}
