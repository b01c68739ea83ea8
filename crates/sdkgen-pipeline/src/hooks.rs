//! Extension points a generator run can install without forking the
//! emitter: which services to emit, what goes at the top of every
//! generated file, how a README's default text is finished, how an
//! operation's stub body reads, and which extra auth schemes a service
//! advertises beyond what its model declares.
//!
//! Grounded in the teacher's single hardcoded `TARGET_OPERATIONS`/
//! `DO NOT EDIT` constants in `codegen/src/codegen.rs`: this registry is
//! what those constants become once a generator serves more than one
//! hardcoded target.

/// Builder-style collection of optional generation hooks.
///
/// Each hook defaults to a no-op (emit everything, leave text as
/// generated); a caller sets only the ones it needs.
#[derive(Default)]
pub struct HookRegistry {
    service_filter: Option<Box<dyn Fn(&str) -> bool + Send + Sync>>,
    script_head: Option<String>,
    readme_writer: Option<Box<dyn Fn(&str) -> String + Send + Sync>>,
    operation_body: Option<Box<dyn Fn(&str, &str) -> String + Send + Sync>>,
    auth_scheme_extender: Option<Box<dyn Fn(Vec<String>) -> Vec<String> + Send + Sync>>,
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("service_filter", &self.service_filter.is_some())
            .field("script_head", &self.script_head.is_some())
            .field("readme_writer", &self.readme_writer.is_some())
            .field("operation_body", &self.operation_body.is_some())
            .field("auth_scheme_extender", &self.auth_scheme_extender.is_some())
            .finish()
    }
}

impl HookRegistry {
    /// An empty registry: every service is emitted, no text is altered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only emit services whose absolute shape id `predicate` accepts.
    #[must_use]
    pub fn with_service_filter(mut self, predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.service_filter = Some(Box::new(predicate));
        self
    }

    /// Prepend `text` to every generated source file, e.g. a license
    /// banner or a codegen-tool marker comment.
    #[must_use]
    pub fn with_script_head(mut self, text: impl Into<String>) -> Self {
        self.script_head = Some(text.into());
        self
    }

    /// Post-process a service's default-generated `README.md` body.
    #[must_use]
    pub fn with_readme_writer(mut self, writer: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.readme_writer = Some(Box::new(writer));
        self
    }

    /// Post-process one operation method's generated stub body, given the
    /// operation's shape name and the default-generated body text.
    #[must_use]
    pub fn with_operation_body(mut self, writer: impl Fn(&str, &str) -> String + Send + Sync + 'static) -> Self {
        self.operation_body = Some(Box::new(writer));
        self
    }

    /// Extend the auth-scheme list a service's client advertises beyond
    /// what the model's `@auth` trait names.
    #[must_use]
    pub fn with_auth_scheme_extender(mut self, extender: impl Fn(Vec<String>) -> Vec<String> + Send + Sync + 'static) -> Self {
        self.auth_scheme_extender = Some(Box::new(extender));
        self
    }

    /// Whether `service_absolute_id` should be emitted.
    #[must_use]
    pub fn accepts_service(&self, service_absolute_id: &str) -> bool {
        self.service_filter.as_ref().is_none_or(|f| f(service_absolute_id))
    }

    /// Apply the script-head hook, if any, prepended ahead of `body`.
    #[must_use]
    pub fn apply_script_head(&self, body: String) -> String {
        match &self.script_head {
            Some(head) => format!("{head}\n{body}"),
            None => body,
        }
    }

    /// Apply the README post-processing hook, if any.
    #[must_use]
    pub fn apply_readme_writer(&self, default_text: &str) -> String {
        self.readme_writer.as_ref().map_or_else(|| default_text.to_owned(), |writer| writer(default_text))
    }

    /// Apply the operation-body post-processing hook, if any.
    #[must_use]
    pub fn apply_operation_body(&self, operation_name: &str, default_body: &str) -> String {
        self.operation_body.as_ref().map_or_else(|| default_body.to_owned(), |writer| writer(operation_name, default_body))
    }

    /// Apply the auth-scheme extender hook, if any.
    #[must_use]
    pub fn apply_auth_scheme_extender(&self, schemes: Vec<String>) -> Vec<String> {
        self.auth_scheme_extender.as_ref().map_or(schemes.clone(), |extender| extender(schemes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_accepts_everything_unmodified() {
        let hooks = HookRegistry::new();
        assert!(hooks.accepts_service("com.example#Svc"));
        assert_eq!(hooks.apply_readme_writer("default"), "default");
    }

    #[test]
    fn service_filter_restricts_emission() {
        let hooks = HookRegistry::new().with_service_filter(|id| id.ends_with("#Allowed"));
        assert!(hooks.accepts_service("com.example#Allowed"));
        assert!(!hooks.accepts_service("com.example#Other"));
    }

    #[test]
    fn script_head_is_prepended() {
        let hooks = HookRegistry::new().with_script_head("// generated");
        assert_eq!(hooks.apply_script_head("fn main() {}".to_owned()), "// generated\nfn main() {}");
    }

    #[test]
    fn auth_scheme_extender_appends_schemes() {
        let hooks = HookRegistry::new().with_auth_scheme_extender(|mut schemes| {
            schemes.push("custom".to_owned());
            schemes
        });
        assert_eq!(hooks.apply_auth_scheme_extender(vec!["sigv4".to_owned()]), vec!["sigv4", "custom"]);
    }
}
