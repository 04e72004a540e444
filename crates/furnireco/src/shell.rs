//! Interactive app shell
//!
//! Two routes behind a persistent navigation bar. Typing a path navigates;
//! anything else on the home page is a search. Leaving a page drops it along
//! with everything it loaded.

use anyhow::Result;
use colored::*;
use std::io::Write;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::client::RecommendationBackend;
use crate::notice::{self, Notifier};
use crate::pages::{AnalyticsPage, SearchPage};

pub const BRAND: &str = "FurniReco";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
  Search,
  Analytics,
}

impl Route {
  pub const ALL: [Route; 2] = [Route::Search, Route::Analytics];

  pub fn path(self) -> &'static str {
    match self {
      Route::Search => "/",
      Route::Analytics => "/analytics",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Route::Search => "Home",
      Route::Analytics => "Analytics",
    }
  }

  pub fn from_path(path: &str) -> Option<Route> {
    let path = path.trim();
    let path = if path.len() > 1 { path.trim_end_matches('/') } else { path };
    Route::ALL.into_iter().find(|route| route.path() == path)
  }
}

/// The navigation bar, with the active route highlighted
pub fn render_nav(active: Route) -> String {
  let links = Route::ALL
    .iter()
    .map(|&route| {
      let link = format!("{} ({})", route.label(), route.path());
      if route == active {
        link.cyan().bold().underline().to_string()
      } else {
        link
      }
    })
    .collect::<Vec<_>>()
    .join(" | ");

  format!("{} | {}", BRAND.bold(), links)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
  Navigate(Route),
  UnknownRoute(String),
  Search(String),
  Quit,
  Blank,
}

pub fn parse_command(line: &str) -> ShellCommand {
  let line = line.trim();
  match line {
    "" => ShellCommand::Blank,
    ":q" | ":quit" => ShellCommand::Quit,
    path if path.starts_with('/') => match Route::from_path(path) {
      Some(route) => ShellCommand::Navigate(route),
      None => ShellCommand::UnknownRoute(path.to_string()),
    },
    query => ShellCommand::Search(query.to_string()),
  }
}

enum ActivePage {
  Search(SearchPage),
  Analytics(AnalyticsPage),
}

pub struct AppShell {
  backend: Arc<dyn RecommendationBackend>,
  notifier: Arc<dyn Notifier>,
  top_k: usize,
  page: ActivePage,
}

impl AppShell {
  pub fn new(
    backend: Arc<dyn RecommendationBackend>,
    notifier: Arc<dyn Notifier>,
    top_k: usize,
  ) -> Self {
    let page = ActivePage::Search(
      SearchPage::new(Arc::clone(&backend), Arc::clone(&notifier)).with_top_k(top_k),
    );
    Self { backend, notifier, top_k, page }
  }

  pub fn route(&self) -> Route {
    match self.page {
      ActivePage::Search(_) => Route::Search,
      ActivePage::Analytics(_) => Route::Analytics,
    }
  }

  pub fn search_page(&self) -> Option<&SearchPage> {
    match &self.page {
      ActivePage::Search(page) => Some(page),
      ActivePage::Analytics(_) => None,
    }
  }

  pub fn analytics_page(&self) -> Option<&AnalyticsPage> {
    match &self.page {
      ActivePage::Analytics(page) => Some(page),
      ActivePage::Search(_) => None,
    }
  }

  /// Switch pages. Following the link to the page already shown keeps it.
  pub async fn navigate(&mut self, route: Route) {
    if route == self.route() {
      return;
    }
    tracing::debug!(from = self.route().path(), to = route.path(), "navigating");

    let backend = Arc::clone(&self.backend);
    let notifier = Arc::clone(&self.notifier);
    self.page = match route {
      Route::Search => ActivePage::Search(SearchPage::new(backend, notifier).with_top_k(self.top_k)),
      Route::Analytics => ActivePage::Analytics(AnalyticsPage::new(backend, notifier)),
    };

    if let ActivePage::Analytics(page) = &self.page {
      page.ensure_loaded().await;
    }
  }

  pub async fn handle(&mut self, command: ShellCommand) -> ControlFlow<()> {
    match command {
      ShellCommand::Quit => return ControlFlow::Break(()),
      ShellCommand::Blank => {}
      ShellCommand::Navigate(route) => self.navigate(route).await,
      ShellCommand::UnknownRoute(path) => {
        notice::warn(&format!("No page at {path}. Try / or /analytics."));
      }
      ShellCommand::Search(query) => match &self.page {
        ActivePage::Search(page) => {
          page.search(&query).await;
        }
        ActivePage::Analytics(_) => {
          notice::info("Searching happens on the Home page. Type / to go there.");
        }
      },
    }
    ControlFlow::Continue(())
  }

  pub fn render(&self) {
    println!();
    println!("{}", render_nav(self.route()));
    println!();

    match &self.page {
      ActivePage::Search(page) => {
        if page.state().query.is_empty() {
          println!("{}", "Find the perfect furniture for your space".bold());
          println!(
            "{}",
            "Ask naturally, for example: \"Show me modern wooden chairs under ₹5000\"".dimmed()
          );
        }
        page.render();
      }
      ActivePage::Analytics(page) => {
        println!("{}", "Dataset Analytics".bold());
        println!();
        page.render();
      }
    }
  }

  /// Read commands until `:q` or end of input
  pub async fn run<R>(&mut self, input: R) -> Result<()>
  where
    R: AsyncBufRead + Unpin,
  {
    let mut lines = input.lines();
    self.render();

    loop {
      print!("{} ", format!("furnireco {}>", self.route().path()).green());
      std::io::stdout().flush()?;

      let Some(line) = lines.next_line().await? else {
        println!();
        break;
      };

      let command = parse_command(&line);
      let redraw = command != ShellCommand::Blank;
      if self.handle(command).await.is_break() {
        break;
      }
      if redraw {
        self.render();
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_routes_round_trip_paths() {
    for route in Route::ALL {
      assert_eq!(Route::from_path(route.path()), Some(route));
    }
    assert_eq!(Route::from_path("/analytics/"), Some(Route::Analytics));
    assert_eq!(Route::from_path("/settings"), None);
    assert_eq!(Route::from_path(""), None);
  }

  #[test]
  fn test_parse_command() {
    assert_eq!(parse_command("  "), ShellCommand::Blank);
    assert_eq!(parse_command(":q"), ShellCommand::Quit);
    assert_eq!(parse_command(":quit"), ShellCommand::Quit);
    assert_eq!(parse_command("/"), ShellCommand::Navigate(Route::Search));
    assert_eq!(parse_command(" /analytics "), ShellCommand::Navigate(Route::Analytics));
    assert_eq!(parse_command("/nope"), ShellCommand::UnknownRoute("/nope".to_string()));
    assert_eq!(
      parse_command("modern wooden chair"),
      ShellCommand::Search("modern wooden chair".to_string())
    );
  }

  #[test]
  fn test_nav_lists_both_links() {
    colored::control::set_override(false);
    assert_eq!(
      render_nav(Route::Analytics),
      "FurniReco | Home (/) | Analytics (/analytics)"
    );
  }
}
