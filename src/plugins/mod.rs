//! Name → constructor registries for filters and reporters.
//!
//! Configuration selects plugins by a stable identifier (`filter.class`,
//! reporter `class`). Built-in plugins are present from the first lookup;
//! applications register their own at startup.

mod register;

pub use register::{
    FilterConstructor, ReporterConstructor, debug_plugin_registry, get_filter_plugin,
    get_filter_plugin_names, get_reporter_plugin, get_reporter_plugin_names, load_filter,
    load_reporter, register_filter_plugin, register_reporter_plugin,
};
