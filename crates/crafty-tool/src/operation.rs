#![forbid(unsafe_code)]

//! Undo-wrapped model operations.
//!
//! Every model change a tool makes is grouped into one named host
//! operation so that a single undo reverts it. [`wrap_with_undo`] opens the
//! operation, runs the block, and commits or aborts depending on its result.

/// Host undo stack.
pub trait UndoHost {
    /// Open a named operation. Later model changes join it.
    fn start_operation(&mut self, name: &str);

    /// Close the open operation, keeping its changes.
    fn commit_operation(&mut self);

    /// Close the open operation, reverting its changes.
    fn abort_operation(&mut self);
}

/// Failure of an undo-wrapped block.
#[derive(Debug, thiserror::Error)]
pub enum OperationError<E>
where
    E: std::error::Error + 'static,
{
    /// The block failed and its operation was aborted.
    #[error("operation '{name}' aborted: {source}")]
    Aborted {
        name: String,
        #[source]
        source: E,
    },
}

impl<E> OperationError<E>
where
    E: std::error::Error + 'static,
{
    /// The error returned by the block.
    pub fn into_source(self) -> E {
        match self {
            Self::Aborted { source, .. } => source,
        }
    }
}

/// Run `f` inside the host operation `name`.
///
/// On `Ok` the operation is committed; on `Err` it is aborted and the error
/// is returned wrapped in [`OperationError::Aborted`]. With `suppress` set
/// no operation is opened, for callers already running inside one.
pub fn wrap_with_undo<H, T, E, F>(
    host: &mut H,
    name: &str,
    suppress: bool,
    f: F,
) -> Result<T, OperationError<E>>
where
    H: UndoHost + ?Sized,
    E: std::error::Error + 'static,
    F: FnOnce(&mut H) -> Result<T, E>,
{
    let wrap = |source| OperationError::Aborted {
        name: name.to_owned(),
        source,
    };
    if suppress {
        return f(host).map_err(wrap);
    }

    host.start_operation(name);
    match f(host) {
        Ok(value) => {
            host.commit_operation();
            tracing::debug!(target: "crafty.tool", operation = name, "operation committed");
            Ok(value)
        }
        Err(source) => {
            host.abort_operation();
            tracing::warn!(
                target: "crafty.tool",
                operation = name,
                error = %source,
                "operation aborted"
            );
            Err(wrap(source))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Host {
        log: Vec<String>,
    }

    impl UndoHost for Host {
        fn start_operation(&mut self, name: &str) {
            self.log.push(format!("start {name}"));
        }
        fn commit_operation(&mut self) {
            self.log.push("commit".into());
        }
        fn abort_operation(&mut self) {
            self.log.push("abort".into());
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("kernel refused")]
    struct Refused;

    #[test]
    fn success_commits_exactly_once() {
        let mut host = Host::default();
        let out = wrap_with_undo(&mut host, "Face to Panel", false, |h| {
            h.log.push("work".into());
            Ok::<_, Refused>(7)
        });
        assert_eq!(out.unwrap(), 7);
        assert_eq!(host.log, ["start Face to Panel", "work", "commit"]);
    }

    #[test]
    fn failure_aborts_exactly_once_and_propagates() {
        let mut host = Host::default();
        let out: Result<(), _> = wrap_with_undo(&mut host, "Face to Panel", false, |_| Err(Refused));
        let err = out.unwrap_err();
        assert_eq!(err.to_string(), "operation 'Face to Panel' aborted: kernel refused");
        assert!(matches!(err.into_source(), Refused));
        assert_eq!(host.log, ["start Face to Panel", "abort"]);
    }

    #[test]
    fn suppress_runs_block_unwrapped() {
        let mut host = Host::default();
        let ok = wrap_with_undo(&mut host, "inner", true, |_| Ok::<_, Refused>(()));
        assert!(ok.is_ok());
        let err = wrap_with_undo(&mut host, "inner", true, |_| Err::<(), _>(Refused));
        assert!(err.is_err());
        assert!(host.log.is_empty());
    }
}
