//! Robots.txt parser implementation
//!
//! Path matching is delegated to the robotstxt crate's matcher. Group
//! membership and `Crawl-delay` are collected from the same crate's parser
//! callbacks, with product tokens compared the way the matcher compares them.

use robotstxt::{parse_robotstxt, DefaultMatcher, RobotsParseHandler};

/// One `User-agent` group and the crawl delay declared inside it
#[derive(Debug, Default)]
struct AgentGroup {
    /// Product tokens, or `*` for the global group
    agents: Vec<String>,
    crawl_delay: Option<f64>,
}

impl AgentGroup {
    fn is_global(&self) -> bool {
        self.agents.iter().any(|ua| ua == "*")
    }

    fn names(&self, agent: &str) -> bool {
        self.agents.iter().any(|ua| token_matches(ua, agent))
    }
}

/// Builds agent groups from parser callbacks
///
/// A `User-agent` line that follows any rule line opens a new group.
#[derive(Default)]
struct GroupCollector {
    groups: Vec<AgentGroup>,
    seen_rule: bool,
}

impl GroupCollector {
    fn current(&mut self) -> Option<&mut AgentGroup> {
        self.seen_rule = true;
        self.groups.last_mut()
    }
}

impl RobotsParseHandler for GroupCollector {
    fn handle_robots_start(&mut self) {}

    fn handle_robots_end(&mut self) {}

    fn handle_user_agent(&mut self, _line_num: u32, user_agent: &str) {
        if self.seen_rule || self.groups.is_empty() {
            self.groups.push(AgentGroup::default());
            self.seen_rule = false;
        }
        if let Some(group) = self.groups.last_mut() {
            group.agents.push(product_token(user_agent).to_string());
        }
    }

    fn handle_allow(&mut self, _line_num: u32, _value: &str) {
        self.current();
    }

    fn handle_disallow(&mut self, _line_num: u32, _value: &str) {
        self.current();
    }

    fn handle_sitemap(&mut self, _line_num: u32, _value: &str) {}

    fn handle_unknown_action(&mut self, _line_num: u32, action: &str, value: &str) {
        let delay = action
            .eq_ignore_ascii_case("crawl-delay")
            .then(|| value.trim().parse::<f64>().ok())
            .flatten();
        if let (Some(group), Some(delay)) = (self.current(), delay) {
            group.crawl_delay = Some(delay);
        }
    }
}

/// Parsed robots.txt data
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    /// Whether to allow all (true = allow all, false = parse content)
    allow_all: bool,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// This is used when robots.txt is missing or cannot be fetched.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The robots.txt product token (e.g. "SumiScout")
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.allow_all || self.content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// Returns true if a `User-agent` line names this crawler specifically
    ///
    /// The wildcard group does not count.
    pub fn names_agent(&self, user_agent: &str) -> bool {
        self.groups().iter().any(|g| g.names(user_agent))
    }

    /// Returns true if the file names this crawler and shuts it out of the site root
    ///
    /// A blanket `Disallow: /` aimed only at `*` does not deny us; it has to be
    /// combined with our own product token.
    ///
    /// # Arguments
    ///
    /// * `site_root` - Absolute URL of the site root (e.g. "https://clinic.example/")
    /// * `user_agent` - The robots.txt product token
    pub fn denies_agent(&self, site_root: &str, user_agent: &str) -> bool {
        self.names_agent(user_agent) && !self.is_allowed(site_root, user_agent)
    }

    /// Gets the crawl delay for a specific user agent
    ///
    /// # Returns
    ///
    /// * `Some(f64)` - The crawl delay in seconds, preferring our own group over `*`
    /// * `None` - If no crawl delay applies
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        if self.allow_all || self.content.is_empty() {
            return None;
        }

        let mut for_wildcard = None;
        let mut for_agent = None;

        for group in self.groups() {
            let Some(delay) = group.crawl_delay else {
                continue;
            };
            if group.names(user_agent) {
                for_agent = Some(delay);
            } else if group.is_global() {
                for_wildcard = Some(delay);
            }
        }

        for_agent.or(for_wildcard)
    }

    /// Collects the file's `User-agent` groups
    fn groups(&self) -> Vec<AgentGroup> {
        let mut collector = GroupCollector::default();
        parse_robotstxt(&self.content, &mut collector);
        collector.groups
    }
}

/// The matchable part of a `User-agent` value: `*`, or the leading
/// `[a-zA-Z_-]` run ("SumiScout/1.0" becomes "SumiScout")
fn product_token(value: &str) -> &str {
    let value = value.trim();
    if value == "*" || value.starts_with("* ") {
        return "*";
    }
    let end = value
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '-' || c == '_'))
        .unwrap_or(value.len());
    &value[..end]
}

/// Whether a group's product token addresses our crawler
///
/// Tokens compare case-insensitively and in full; the global group never matches.
fn token_matches(group_agent: &str, agent: &str) -> bool {
    !group_agent.is_empty() && group_agent != "*" && group_agent.eq_ignore_ascii_case(agent)
}
