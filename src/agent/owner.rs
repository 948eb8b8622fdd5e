//! Which OS account owns and runs the agent.
//!
//! Three sources, first success wins:
//!
//! 1. `user = ...` in the nginx section of an existing agent config
//! 2. the `user <name>;` directive of the nginx config itself
//! 3. the literal default `nginx`
//!
//! The agent config may also point at a non-default nginx config through a
//! `configfile` key in the same section.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::probe::FallbackChain;

/// Account used when no config names one.
pub const DEFAULT_OWNER: &str = "nginx";

/// Where the resolved owner came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerSource {
    AgentConfig,
    ServerConfig,
    Default,
}

/// Result of owner resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOwner {
    pub name: String,
    pub source: OwnerSource,
}

/// Lines of the first `[...nginx...]` section, with comment lines removed.
fn nginx_section(agent_conf: &str) -> Vec<&str> {
    let mut lines = agent_conf.lines().filter(|l| !l.contains('#'));
    let header = lines.by_ref().find(|l| {
        let t = l.trim();
        t.starts_with('[') && t.ends_with(']') && t.to_lowercase().contains("nginx")
    });
    if header.is_none() {
        return Vec::new();
    }
    lines
        .take_while(|l| !l.trim_start().starts_with('['))
        .collect()
}

/// Value of the first line in the nginx section whose key part contains
/// `needle` (case-insensitive), with all spaces removed.
fn section_value(agent_conf: &str, needle: &str) -> Option<String> {
    nginx_section(agent_conf).into_iter().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        if !key.to_lowercase().contains(needle) {
            return None;
        }
        let value: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        (!value.is_empty()).then_some(value)
    })
}

/// The `user` named in the agent config's nginx section.
pub fn agent_config_user(agent_conf: &str) -> Option<String> {
    section_value(agent_conf, "user")
}

/// Nginx config path named by the agent config's `configfile` key.
pub fn agent_config_server_path(agent_conf: &str) -> Option<PathBuf> {
    section_value(agent_conf, "configfile").map(PathBuf::from)
}

static USER_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*user\s+([^;]*);").expect("valid user directive regex"));
static COMMENTED_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#.*user.*;").expect("valid comment regex"));
static CANDIDATE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"user\s").expect("valid candidate regex"));

/// The account named by the first usable `user` directive.
///
/// A line qualifies when it contains `user` followed by whitespace, has no
/// `#` before a `user ...;`, and does not contain `_user` anywhere. The
/// owner is the first word after the last `user` up to the semicolon.
pub fn server_config_user(server_conf: &str) -> Option<String> {
    server_conf
        .lines()
        .filter(|l| CANDIDATE_LINE.is_match(l))
        .filter(|l| !COMMENTED_DIRECTIVE.is_match(l))
        .filter(|l| !l.contains("_user"))
        .find_map(|l| {
            let captures = USER_DIRECTIVE.captures(l)?;
            captures
                .get(1)?
                .as_str()
                .split_whitespace()
                .next()
                .map(str::to_string)
        })
}

/// Resolve the owner from already-read config texts.
pub fn resolve_owner(agent_conf: Option<&str>, server_conf: Option<&str>) -> ResolvedOwner {
    let (label, name) = FallbackChain::new()
        .or_try("agent config", || agent_conf.and_then(agent_config_user))
        .or_try("server config", || server_conf.and_then(server_config_user))
        .resolve_or(DEFAULT_OWNER.to_string());

    let source = match label {
        "agent config" => OwnerSource::AgentConfig,
        "server config" => OwnerSource::ServerConfig,
        _ => OwnerSource::Default,
    };
    tracing::debug!("agent owner '{}' from {}", name, label);
    ResolvedOwner { name, source }
}

/// Resolve the owner from files on disk.
///
/// Missing or unreadable files simply drop out of the chain.
pub fn resolve_owner_from_files(agent_conf_path: &Path, default_server_conf: &Path) -> ResolvedOwner {
    let agent_conf = std::fs::read_to_string(agent_conf_path).ok();
    let server_path = agent_conf
        .as_deref()
        .and_then(agent_config_server_path)
        .unwrap_or_else(|| default_server_conf.to_path_buf());
    let server_conf = std::fs::read_to_string(&server_path).ok();

    resolve_owner(agent_conf.as_deref(), server_conf.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const AGENT_CONF: &str = "\
[credentials]
api_key = abc

[extensions]
phpfpm = False

[nginx]
user = alice
configfile = /opt/nginx/conf/nginx.conf
";

    const SERVER_CONF: &str = "\
user  bob www-data;
worker_processes auto;
";

    #[test]
    fn agent_config_wins_regardless_of_server_config() {
        let owner = resolve_owner(Some(AGENT_CONF), Some(SERVER_CONF));
        assert_eq!(owner.name, "alice");
        assert_eq!(owner.source, OwnerSource::AgentConfig);
    }

    #[test]
    fn server_config_used_without_agent_config() {
        let owner = resolve_owner(None, Some(SERVER_CONF));
        assert_eq!(owner.name, "bob");
        assert_eq!(owner.source, OwnerSource::ServerConfig);
    }

    #[test]
    fn default_when_neither_source_names_a_user() {
        let owner = resolve_owner(None, None);
        assert_eq!(owner.name, "nginx");
        assert_eq!(owner.source, OwnerSource::Default);
    }

    #[test]
    fn agent_config_without_user_falls_through() {
        let conf = "[nginx]\nconfigfile = /etc/nginx/nginx.conf\n";
        assert_eq!(resolve_owner(Some(conf), Some(SERVER_CONF)).name, "bob");
    }

    #[test]
    fn agent_user_outside_nginx_section_is_ignored() {
        let conf = "[credentials]\nuser = mallory\n[nginx]\nstub_status = /x\n";
        assert_eq!(agent_config_user(conf), None);
    }

    #[test]
    fn agent_section_match_is_case_insensitive_and_loose() {
        let conf = "[Nginx-Plus]\nUser = carol\n";
        assert_eq!(agent_config_user(conf).as_deref(), Some("carol"));
    }

    #[test]
    fn agent_config_comment_lines_are_dropped() {
        let conf = "[nginx]\n# user = ghost\nuser = dave\n";
        assert_eq!(agent_config_user(conf).as_deref(), Some("dave"));
    }

    #[test]
    fn agent_config_spaces_are_removed_from_value() {
        let conf = "[nginx]\nuser =  www data \n";
        assert_eq!(agent_config_user(conf).as_deref(), Some("wwwdata"));
    }

    #[test]
    fn agent_config_points_at_server_config() {
        assert_eq!(
            agent_config_server_path(AGENT_CONF),
            Some(PathBuf::from("/opt/nginx/conf/nginx.conf"))
        );
    }

    #[test]
    fn commented_server_directive_is_skipped() {
        let conf = "#user nobody;\nuser www-data;\n";
        assert_eq!(server_config_user(conf).as_deref(), Some("www-data"));
    }

    #[test]
    fn underscore_user_lines_are_excluded() {
        let conf = "    proxy_set_header X-Remote-User $remote_user ;\nuser erin;\n";
        assert_eq!(server_config_user(conf).as_deref(), Some("erin"));
    }

    #[test]
    fn directive_needs_a_semicolon() {
        assert_eq!(server_config_user("user frank\n"), None);
    }

    #[test]
    fn last_user_occurrence_on_a_line_wins() {
        let conf = "# user marker then user grace;\n";
        // Comment with `user ...;` after '#': excluded entirely.
        assert_eq!(server_config_user(conf), None);
        assert_eq!(
            server_config_user("load user heidi; user ivan;\n").as_deref(),
            Some("ivan")
        );
    }

    #[test]
    fn resolves_from_files_following_configfile() {
        let temp = TempDir::new().unwrap();
        let custom_server = temp.path().join("custom-nginx.conf");
        std::fs::write(&custom_server, "user judy;\n").unwrap();
        let agent = temp.path().join("agent.conf");
        std::fs::write(
            &agent,
            format!("[nginx]\nconfigfile = {}\n", custom_server.display()),
        )
        .unwrap();

        let owner = resolve_owner_from_files(&agent, &temp.path().join("missing.conf"));
        assert_eq!(owner.name, "judy");
        assert_eq!(owner.source, OwnerSource::ServerConfig);
    }

    #[test]
    fn resolves_default_when_files_are_missing() {
        let temp = TempDir::new().unwrap();
        let owner = resolve_owner_from_files(
            &temp.path().join("agent.conf"),
            &temp.path().join("nginx.conf"),
        );
        assert_eq!(owner.source, OwnerSource::Default);
    }
}
