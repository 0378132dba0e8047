//! Status codes: local status vocabularies and their aggregation
//!
//! Every unit owns a contiguous slice of a flat integer code space. A unit
//! reserves `width` slots for itself, followed by one slice per dependency in
//! declaration order. Full success anywhere collapses to `0`; the first
//! failure found (own status first, then dependencies in order) wins.

use std::fmt;

use tracing::{trace, warn};

use crate::domain::unit::UnitRef;

/// A closed status vocabulary of a unit.
///
/// Ordinal `0` always means "no error"; the width of the vocabulary is the
/// number of variants. Use [`local_status!`](crate::local_status) to declare
/// one.
pub trait LocalStatus: Copy + fmt::Debug + 'static {
    /// All variants, in ordinal order. The first one is the success value.
    const ALL: &'static [Self];

    /// Position of this variant in [`LocalStatus::ALL`].
    fn ordinal(self) -> u32;

    /// Width of the vocabulary as a code-space reservation.
    fn width() -> StatusWidth {
        StatusWidth::Weighted(Self::ALL.len() as u32)
    }

    fn is_success(self) -> bool {
        self.ordinal() == 0
    }
}

/// How many code slots a unit occupies in its parent's code space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusWidth {
    /// The unit declares a vocabulary of this many values.
    Weighted(u32),
    /// The unit exposes only success/failure; it always occupies one slot.
    Opaque,
}

impl StatusWidth {
    /// Number of slots reserved in the flat code space.
    pub fn slots(self) -> u32 {
        match self {
            StatusWidth::Weighted(width) => width,
            StatusWidth::Opaque => 1,
        }
    }
}

impl fmt::Display for StatusWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusWidth::Weighted(width) => write!(f, "{width}"),
            StatusWidth::Opaque => f.write_str("opaque"),
        }
    }
}

/// Fold a unit's own status and its dependencies into one status code.
///
/// * a non-zero local ordinal is returned as is, dependencies are not polled
/// * otherwise the unit's own slots are skipped and each dependency is polled
///   in order; a succeeding dependency advances the base by its slot count
/// * the first failing dependency yields `base + code` when it declares a
///   width, or `base + 1` when it is opaque
/// * all dependencies succeeding yields `0`
/// * a dependency that is mutably borrowed (busy) cannot be polled and
///   counts as an opaque failure
pub fn aggregate(local: Option<u32>, own: StatusWidth, dependencies: &[UnitRef]) -> u32 {
    if let Some(ordinal) = local.filter(|&ordinal| ordinal > 0) {
        return ordinal;
    }
    let mut base = own.slots();
    for dependency in dependencies {
        let Ok(dependency) = dependency.try_borrow() else {
            warn!(base, "dependency is busy, status unknown; reporting it as failed");
            return base.saturating_add(1);
        };
        let code = dependency.status_code();
        let width = dependency.status_width();
        if code == 0 {
            base = base.saturating_add(width.slots());
            continue;
        }
        trace!(
            unit = %dependency.name(),
            code,
            base,
            "dependency failed, remaining dependencies not polled"
        );
        return match width {
            StatusWidth::Weighted(_) => base.saturating_add(code),
            StatusWidth::Opaque => base.saturating_add(1),
        };
    }
    0
}

/// Total size of a unit's code space: own width plus every dependency's slots.
pub fn max_code(own: StatusWidth, dependencies: &[UnitRef]) -> u32 {
    dependencies.iter().fold(own.slots(), |sum, dependency| {
        let slots = match dependency.try_borrow() {
            Ok(dependency) => dependency.status_width().slots(),
            Err(_) => {
                warn!("dependency is busy, counting one slot");
                1
            }
        };
        sum.saturating_add(slots)
    })
}

/// Declare a closed status vocabulary for a unit.
///
/// The first variant is the success value (ordinal `0`).
///
/// ```
/// launchkit::local_status! {
///     pub enum FetchStatus {
///         Ok,
///         Unreachable,
///         Corrupt,
///     }
/// }
///
/// use launchkit::domain::LocalStatus;
/// assert_eq!(FetchStatus::Corrupt.ordinal(), 2);
/// assert_eq!(FetchStatus::width().slots(), 3);
/// ```
#[macro_export]
macro_rules! local_status {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(#[$ok_meta:meta])*
            $ok:ident
            $(, $(#[$variant_meta:meta])* $variant:ident)*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(#[$ok_meta])*
            $ok,
            $($(#[$variant_meta])* $variant,)*
        }

        impl $crate::domain::LocalStatus for $name {
            const ALL: &'static [Self] = &[$name::$ok $(, $name::$variant)*];

            fn ordinal(self) -> u32 {
                self as u32
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::local_status! {
        enum Probe {
            Ok,
            Slow,
            Dead,
        }
    }

    #[test]
    fn given_declared_vocabulary_when_queried_then_ordinals_follow_declaration() {
        assert_eq!(Probe::Ok.ordinal(), 0);
        assert_eq!(Probe::Slow.ordinal(), 1);
        assert_eq!(Probe::Dead.ordinal(), 2);
        assert!(Probe::Ok.is_success());
        assert!(!Probe::Dead.is_success());
        assert_eq!(Probe::width(), StatusWidth::Weighted(3));
    }

    #[test]
    fn given_widths_when_counting_slots_then_opaque_takes_one() {
        assert_eq!(StatusWidth::Weighted(4).slots(), 4);
        assert_eq!(StatusWidth::Opaque.slots(), 1);
    }

    #[test]
    fn given_no_dependencies_when_aggregating_then_local_status_decides() {
        assert_eq!(aggregate(None, StatusWidth::Weighted(3), &[]), 0);
        assert_eq!(aggregate(Some(0), StatusWidth::Weighted(3), &[]), 0);
        assert_eq!(aggregate(Some(2), StatusWidth::Weighted(3), &[]), 2);
    }

    #[test]
    fn given_no_dependencies_when_measuring_then_max_code_is_own_width() {
        assert_eq!(max_code(StatusWidth::Weighted(5), &[]), 5);
        assert_eq!(max_code(StatusWidth::Opaque, &[]), 1);
    }
}
