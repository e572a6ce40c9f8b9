// Query rewriter - Scopes a template block to one agent
use regex::{Captures, Regex};

use super::agent::AgentDescriptor;
use super::error::TemplateError;
use super::panel::{DataSourceClass, DataSourceRef, Panel, PanelBody, QueryTarget};

/// Address used in block templates to stand for "the agent this block
/// monitors". It is only recognised when wrapped in matching single or
/// double quotes, e.g. `'127.0.0.1'` or `"127.0.0.1"`.
#[derive(Debug, Clone)]
pub struct PlaceholderToken {
    token: String,
    pattern: Regex,
}

impl PlaceholderToken {
    pub const DEFAULT: &'static str = "127.0.0.1";

    pub fn new(token: impl Into<String>) -> Result<Self, TemplateError> {
        let token = token.into();
        if token.is_empty() || token.contains(['\'', '"']) {
            return Err(TemplateError::InvalidPlaceholder(token));
        }
        let escaped = regex::escape(&token);
        // No backreferences in `regex`, so each quote style is its own branch.
        let pattern = Regex::new(&format!("'{escaped}'|\"{escaped}\""))
            .map_err(|e| TemplateError::InvalidPlaceholder(e.to_string()))?;
        Ok(Self { token, pattern })
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Replace every quoted occurrence of the token, keeping its quote style.
    pub fn substitute(&self, query: &str, replacement: &str) -> String {
        self.pattern
            .replace_all(query, |caps: &Captures| {
                let quote = &caps[0][..1];
                format!("{quote}{replacement}{quote}")
            })
            .into_owned()
    }
}

impl Default for PlaceholderToken {
    fn default() -> Self {
        // The default token is a literal address with no quote characters.
        Self::new(Self::DEFAULT).unwrap_or_else(|_| unreachable!())
    }
}

/// Fixed identifiers of the logical data sources every block is pointed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceUids {
    pub relational: String,
    pub time_series: String,
}

impl Default for DataSourceUids {
    fn default() -> Self {
        Self {
            relational: "postgres-events".to_string(),
            time_series: "prometheus-metrics".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryRewriter {
    placeholder: PlaceholderToken,
    datasources: DataSourceUids,
}

impl QueryRewriter {
    pub fn new(placeholder: PlaceholderToken, datasources: DataSourceUids) -> Self {
        Self {
            placeholder,
            datasources,
        }
    }

    /// Produce a copy of `block` scoped to `agent`. The template is never
    /// modified.
    pub fn rewrite(&self, block: &[Panel], agent: &AgentDescriptor) -> Result<Vec<Panel>, TemplateError> {
        if block.is_empty() {
            return Err(TemplateError::EmptyBlock);
        }
        if !block.iter().any(Panel::is_header) {
            return Err(TemplateError::MissingHeader);
        }

        Ok(block
            .iter()
            .map(|panel| self.rewrite_panel(panel.clone(), agent))
            .collect())
    }

    fn rewrite_panel(&self, mut panel: Panel, agent: &AgentDescriptor) -> Panel {
        if let Some(ds) = panel.datasource.as_mut() {
            if ds.class() == DataSourceClass::TimeSeries {
                ds.uid = Some(self.datasources.time_series.clone());
            }
        }

        if let PanelBody::Header { title } = &mut panel.body {
            *title = agent.block_title();
        }
        for target in panel.targets.iter_mut().flatten() {
            self.rewrite_target(target, &agent.network_id);
        }

        panel
    }

    fn rewrite_target(&self, target: &mut QueryTarget, network_id: &str) {
        if let Some(ds) = target.datasource.as_mut() {
            self.reassign_datasource(ds);
        }
        if let Some(sql) = target.raw_sql.as_mut() {
            *sql = self.placeholder.substitute(sql, network_id);
        }
        if let Some(expr) = target.expr.as_mut() {
            *expr = self.placeholder.substitute(expr, network_id);
        }
    }

    fn reassign_datasource(&self, ds: &mut DataSourceRef) {
        match ds.class() {
            DataSourceClass::Relational => ds.uid = Some(self.datasources.relational.clone()),
            DataSourceClass::TimeSeries => ds.uid = Some(self.datasources.time_series.clone()),
            DataSourceClass::Other => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::panel::GridPos;
    use serde_json::{json, Map};

    fn ds(kind: &str, uid: &str) -> Option<DataSourceRef> {
        Some(DataSourceRef {
            kind: Some(kind.to_string()),
            uid: Some(uid.to_string()),
            extra: Map::new(),
        })
    }

    fn target(kind: &str, sql: Option<&str>, expr: Option<&str>) -> QueryTarget {
        QueryTarget {
            datasource: ds(kind, "template-uid"),
            raw_sql: sql.map(str::to_string),
            expr: expr.map(str::to_string),
            extra: Map::new(),
        }
    }

    fn block() -> Vec<Panel> {
        let pos = |h, w, x, y| Some(GridPos { h, w, x, y });
        vec![
            Panel::header("Template", pos(1, 24, 0, 0)),
            Panel::metric(
                "gauge",
                ds("prometheus", "template-uid"),
                vec![target("prometheus", None, Some("cpu{instance=\"127.0.0.1\"}"))],
                pos(8, 12, 0, 1),
            ),
            Panel::metric(
                "table",
                ds("grafana-postgresql-datasource", "template-uid"),
                vec![target(
                    "grafana-postgresql-datasource",
                    Some("SELECT * FROM events WHERE agent = '127.0.0.1'"),
                    None,
                )],
                pos(8, 24, 0, 9),
            ),
        ]
    }

    fn rewriter() -> QueryRewriter {
        QueryRewriter::new(PlaceholderToken::default(), DataSourceUids::default())
    }

    #[test]
    fn test_substitute_preserves_quote_style() {
        let token = PlaceholderToken::default();
        assert_eq!(
            token.substitute("up{instance=\"127.0.0.1\"}", "10.0.0.5"),
            "up{instance=\"10.0.0.5\"}"
        );
        assert_eq!(
            token.substitute("WHERE agent = '127.0.0.1'", "10.0.0.5"),
            "WHERE agent = '10.0.0.5'"
        );
    }

    #[test]
    fn test_substitute_ignores_unquoted_and_mismatched() {
        let token = PlaceholderToken::default();
        let query = "host=127.0.0.1 a='127.0.0.1\" b='127.0.0.10'";
        assert_eq!(token.substitute(query, "10.0.0.5"), query);
    }

    #[test]
    fn test_substitute_replaces_every_occurrence() {
        let token = PlaceholderToken::default();
        let out = token.substitute("a='127.0.0.1' OR b=\"127.0.0.1\"", "w-2");
        assert_eq!(out, "a='w-2' OR b=\"w-2\"");
    }

    #[test]
    fn test_token_is_matched_literally() {
        // '.' must not act as a wildcard
        let token = PlaceholderToken::default();
        assert_eq!(token.substitute("'127x0x0x1'", "w"), "'127x0x0x1'");
    }

    #[test]
    fn test_custom_token() {
        let token = PlaceholderToken::new("$agent").unwrap();
        assert_eq!(token.as_str(), "$agent");
        assert_eq!(token.substitute("x='$agent'", "10.1.1.1"), "x='10.1.1.1'");
    }

    #[test]
    fn test_invalid_tokens_rejected() {
        assert!(matches!(PlaceholderToken::new(""), Err(TemplateError::InvalidPlaceholder(_))));
        assert!(matches!(PlaceholderToken::new("a'b"), Err(TemplateError::InvalidPlaceholder(_))));
    }

    #[test]
    fn test_rewrite_scopes_block_to_agent() {
        let template = block();
        let agent = AgentDescriptor::new("W1", "10.0.0.5");
        let out = rewriter().rewrite(&template, &agent).unwrap();

        assert_eq!(out[0].title(), Some("W1(10.0.0.5)"));
        assert_eq!(out[1].datasource.as_ref().unwrap().uid.as_deref(), Some("prometheus-metrics"));
        assert_eq!(out[1].targets()[0].expr.as_deref(), Some("cpu{instance=\"10.0.0.5\"}"));
        assert_eq!(
            out[1].targets()[0].datasource.as_ref().unwrap().uid.as_deref(),
            Some("prometheus-metrics")
        );
        assert_eq!(
            out[2].targets()[0].raw_sql.as_deref(),
            Some("SELECT * FROM events WHERE agent = '10.0.0.5'")
        );
        assert_eq!(
            out[2].targets()[0].datasource.as_ref().unwrap().uid.as_deref(),
            Some("postgres-events")
        );
        // panel-level relational sources are left alone
        assert_eq!(out[2].datasource.as_ref().unwrap().uid.as_deref(), Some("template-uid"));
    }

    #[test]
    fn test_rewrite_does_not_touch_template() {
        let template = block();
        let before = template.clone();
        rewriter().rewrite(&template, &AgentDescriptor::new("W1", "10.0.0.5")).unwrap();
        assert_eq!(template, before);
    }

    #[test]
    fn test_block_shape_is_agent_independent() {
        let template = block();
        let a = rewriter().rewrite(&template, &AgentDescriptor::new("W1", "10.0.0.1")).unwrap();
        let b = rewriter().rewrite(&template, &AgentDescriptor::new("Other", "host-b")).unwrap();

        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.iter().zip(&b) {
            let (ga, gb) = (pa.grid_pos.unwrap(), pb.grid_pos.unwrap());
            assert_eq!((ga.w, ga.h), (gb.w, gb.h));
        }
        assert_ne!(a[0].title(), b[0].title());
    }

    #[test]
    fn test_unknown_datasource_kept() {
        let mut template = block();
        template[1].datasource = ds("loki", "logs");
        let out = rewriter().rewrite(&template, &AgentDescriptor::new("W1", "x")).unwrap();
        assert_eq!(out[1].datasource.as_ref().unwrap().uid.as_deref(), Some("logs"));
    }

    #[test]
    fn test_passthrough_fields_survive() {
        let mut template = block();
        template[1].extra.insert("options".to_string(), json!({"reduceOptions": {"calcs": ["last"]}}));
        let out = rewriter().rewrite(&template, &AgentDescriptor::new("W1", "x")).unwrap();
        assert_eq!(out[1].extra.get("options"), template[1].extra.get("options"));
    }

    #[test]
    fn test_block_without_header_is_integrity_error() {
        let template = block()[1..].to_vec();
        let err = rewriter().rewrite(&template, &AgentDescriptor::new("W1", "x")).unwrap_err();
        assert!(matches!(err, TemplateError::MissingHeader));

        let err = rewriter().rewrite(&[], &AgentDescriptor::new("W1", "x")).unwrap_err();
        assert!(matches!(err, TemplateError::EmptyBlock));
    }

    #[test]
    fn test_header_targets_are_rewritten() {
        let mut template = block();
        template[0].targets = Some(vec![target("prometheus", None, Some("up{a=\"127.0.0.1\"}"))]);

        let out = rewriter().rewrite(&template, &AgentDescriptor::new("W1", "10.0.0.5")).unwrap();
        let header = &out[0];
        assert!(header.is_header());
        assert_eq!(header.targets()[0].expr.as_deref(), Some("up{a=\"10.0.0.5\"}"));
        assert_eq!(
            header.targets()[0].datasource.as_ref().unwrap().uid.as_deref(),
            Some("prometheus-metrics")
        );

        let wire = serde_json::to_value(header).unwrap();
        assert_eq!(wire["targets"][0]["expr"], "up{a=\"10.0.0.5\"}");
    }

    #[test]
    fn test_panel_without_targets_keeps_none() {
        let mut template = block();
        template[1].targets = None;
        let out = rewriter().rewrite(&template, &AgentDescriptor::new("W1", "x")).unwrap();
        assert_eq!(out[1].targets, None);
        assert!(serde_json::to_value(&out[1]).unwrap().get("targets").is_none());
    }
}
