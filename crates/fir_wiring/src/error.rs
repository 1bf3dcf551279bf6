//! Error type for the wiring pass.

use fir_common::IrError;

/// Why a set of wiring annotations could not be applied.
///
/// Every failure is fatal: the pass returns no partial circuit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WiringError {
    /// Two or more sources share a pin label.
    #[error("pin `{pin}` has more than one source: {}", .targets.join(", "))]
    DuplicateSource {
        /// The pin label.
        pin: String,
        /// Every source target of the pin.
        targets: Vec<String>,
    },

    /// A target names a module the circuit does not define.
    #[error("pin `{pin}`: module `{module}` is not defined")]
    UnresolvedModule {
        /// The pin label.
        pin: String,
        /// The missing module.
        module: String,
    },

    /// A component target names nothing declared in its module.
    #[error("pin `{pin}`: `{target}` names no port or declaration")]
    UnresolvedComponent {
        /// The pin label.
        pin: String,
        /// The component target, `Module>component`.
        target: String,
    },

    /// Sinks were given for a pin that has no source.
    #[error("pin `{pin}` has sinks but no source")]
    MissingSource {
        /// The pin label.
        pin: String,
    },

    /// The source module is instantiated zero times or more than once under `main`.
    #[error("pin `{pin}`: source module `{module}` must be instantiated exactly once under main, found {count}")]
    SourceNotUnique {
        /// The pin label.
        pin: String,
        /// The source module.
        module: String,
        /// Number of instance paths from `main`.
        count: usize,
    },

    /// A sink module is never instantiated under `main`.
    #[error("pin `{pin}`: sink module `{module}` is never instantiated under main")]
    SinkNotInstantiated {
        /// The pin label.
        pin: String,
        /// The sink module.
        module: String,
    },

    /// A sink module encloses the source, so it cannot receive it as an input.
    #[error("pin `{pin}`: sink module `{module}` contains the source `{source_target}`")]
    SinkContainsSource {
        /// The pin label.
        pin: String,
        /// The sink module.
        module: String,
        /// The source target.
        source_target: String,
    },

    /// A port would have to be added to an external module.
    #[error("pin `{pin}`: cannot add a port to external module `{module}`")]
    ExternalModule {
        /// The pin label.
        pin: String,
        /// The external module.
        module: String,
    },

    /// The type of the source component is unknown, so no port can carry it.
    #[error("pin `{pin}`: cannot determine the type of source `{target}`")]
    UnknownSourceType {
        /// The pin label.
        pin: String,
        /// The source target.
        target: String,
    },

    /// A source directive named a whole module.
    #[error("pin `{pin}`: source `{target}` must name a component, not a module")]
    SourceIsModule {
        /// The pin label.
        pin: String,
        /// The module target.
        target: String,
    },

    /// A component path is malformed.
    #[error(transparent)]
    Ir(#[from] IrError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_duplicate_source() {
        let err = WiringError::DuplicateSource {
            pin: "debug".into(),
            targets: vec!["A>x".into(), "B>y".into()],
        };
        assert_eq!(
            err.to_string(),
            "pin `debug` has more than one source: A>x, B>y"
        );
    }

    #[test]
    fn display_source_not_unique() {
        let err = WiringError::SourceNotUnique {
            pin: "p".into(),
            module: "Core".into(),
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "pin `p`: source module `Core` must be instantiated exactly once under main, found 2"
        );
    }

    #[test]
    fn ir_errors_pass_through() {
        let err: WiringError = IrError::new("bad path").into();
        assert_eq!(err.to_string(), "IR error: bad path");
    }
}
