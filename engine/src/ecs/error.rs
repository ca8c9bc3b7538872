use thiserror::Error;

/// Recoverable failures of container operations.
///
/// Misuse such as passing a stale entity to a mutating operation is a programming error and panics
/// instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The entity carries a component that did not opt into copying.
    #[error("component '{component}' cannot be copied")]
    Uncopyable { component: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncopyable_message_names_component() {
        let error = Error::Uncopyable {
            component: "game::Socket",
        };

        assert_eq!(error.to_string(), "component 'game::Socket' cannot be copied");
    }
}
