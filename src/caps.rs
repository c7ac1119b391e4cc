//! Host capability probes
//!
//! Explicit presence checks for the optional host APIs the app leans on.
//! A missing capability is never fatal: each one has a substitute behavior
//! (documented per field) and the gap is surfaced as an advisory.

use tracing::warn;

use crate::core::MemorySnapshot;

/// What the host actually provides, decided once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// `performance.now()` is available; otherwise `Date.now()` substitutes.
    pub performance_now: bool,
    /// A page-visibility signal is available; otherwise window focus
    /// substitutes.
    pub page_visibility: bool,
    /// The host exposes heap usage (non-standard `performance.memory`).
    pub memory_introspection: bool,
}

impl Capabilities {
    /// Probe the host once and log advisories for anything missing.
    pub fn probe() -> Self {
        let caps = Self::detect();
        if !caps.performance_now {
            warn!("Performance API unavailable, falling back to Date.now()");
        }
        if !caps.page_visibility {
            warn!("page visibility signal unavailable, falling back to window focus");
        }
        caps
    }

    #[cfg(target_arch = "wasm32")]
    fn detect() -> Self {
        let window = web_sys::window();
        let performance_now = window.as_ref().and_then(|w| w.performance()).is_some();
        let page_visibility = window.as_ref().and_then(|w| w.document()).is_some();
        Self {
            performance_now,
            page_visibility,
            memory_introspection: memory_snapshot().is_some(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn detect() -> Self {
        Self {
            performance_now: true,
            page_visibility: false,
            memory_introspection: false,
        }
    }
}

/// Read the non-standard `performance.memory` heap counters, if exposed.
#[cfg(target_arch = "wasm32")]
pub fn memory_snapshot() -> Option<MemorySnapshot> {
    const MB: f64 = 1024.0 * 1024.0;

    let performance = web_sys::window()?.performance()?;
    let memory = js_sys::Reflect::get(performance.as_ref(), &"memory".into()).ok()?;
    if memory.is_undefined() || memory.is_null() {
        return None;
    }
    let field = |name: &str| {
        js_sys::Reflect::get(&memory, &name.into())
            .ok()
            .and_then(|v| v.as_f64())
    };
    Some(MemorySnapshot {
        used_mb: field("usedJSHeapSize")? / MB,
        total_mb: field("totalJSHeapSize")? / MB,
        limit_mb: field("jsHeapSizeLimit")? / MB,
    })
}

#[cfg(not(target_arch = "wasm32"))]
pub fn memory_snapshot() -> Option<MemorySnapshot> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_probe_has_expected_substitutes() {
        let caps = Capabilities::probe();
        assert!(caps.performance_now);
        assert!(!caps.page_visibility);
        assert!(!caps.memory_introspection);
        assert_eq!(memory_snapshot(), None);
    }
}
