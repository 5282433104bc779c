//! Markup for the profile card and the repository list.
//!
//! Every function here is pure. User-provided text is escaped before it lands in markup.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use htmlescape::encode_minimal;
use shared::domain::{non_empty, Profile, RepositorySummary};

use crate::controller::LookupView;

pub const PLACEHOLDER: &str = "-";
pub const NO_DESCRIPTION: &str = "No description.";
pub const NO_REPOSITORIES: &str = "No public repositories found.";

/// Formats the account creation date as `M/D/YYYY`.
pub fn format_join_date(created_at: &DateTime<Utc>) -> String {
    created_at.format("%-m/%-d/%Y").to_string()
}

fn text_or_placeholder(value: &Option<String>) -> String {
    non_empty(value).map_or_else(|| PLACEHOLDER.to_string(), encode_minimal)
}

fn blog_cell(blog: &Option<String>) -> String {
    match non_empty(blog) {
        Some(link) => format!(
            r#"<a href="{}" class="link" target="_blank">{}</a>"#,
            encode_minimal(link),
            encode_minimal(link)
        ),
        None => PLACEHOLDER.to_string(),
    }
}

/// Renders the profile summary. The details table always carries the same nine rows.
pub fn render_profile(profile: &Profile) -> String {
    let rows = [
        ("Bio", text_or_placeholder(&profile.bio)),
        ("Repos", profile.public_repos.to_string()),
        ("Followers", profile.followers.to_string()),
        ("Following", profile.following.to_string()),
        ("Location", text_or_placeholder(&profile.location)),
        ("Company", text_or_placeholder(&profile.company)),
        ("Blog", blog_cell(&profile.blog)),
        ("Email", text_or_placeholder(&profile.email)),
        ("Joined", format_join_date(&profile.created_at)),
    ];

    let mut table = String::new();
    for (label, value) in rows {
        let _ = writeln!(
            table,
            r#"        <tr><td class="label">{label}</td><td>{value}</td></tr>"#
        );
    }

    format!(
        r#"<div class="profile-header">
  <img src="{avatar}" alt="User Avatar" class="avatar" />
  <div>
    <div class="display-name">{name}</div>
    <div class="handle">@{login}</div>
  </div>
</div>
<div class="profile-details">
  <table>
    <tbody>
{table}    </tbody>
  </table>
</div>"#,
        avatar = encode_minimal(&profile.avatar_url),
        name = encode_minimal(profile.display_name()),
        login = encode_minimal(&profile.login),
    )
}

fn render_repository(repo: &RepositorySummary) -> String {
    let visibility = if repo.is_private { "Private" } else { "Public" };
    let description =
        non_empty(&repo.description).map_or_else(|| NO_DESCRIPTION.to_string(), encode_minimal);

    format!(
        r#"<li class="repository">
  <div>
    <a href="{url}" target="_blank" class="repository-name">{name}</a>
    <span class="visibility">{visibility}</span>
    <div class="description">{description}</div>
  </div>
  <div class="counters">
    <span>⭐ {stars}</span>
    <span>🍴 {forks}</span>
  </div>
</li>"#,
        url = encode_minimal(&repo.html_url),
        name = encode_minimal(&repo.name),
        stars = repo.stargazers_count,
        forks = repo.forks_count,
    )
}

/// Rendered contents of the repository region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RepositoryArea {
    #[default]
    Blank,
    NoRepositories,
    Listing(Vec<String>),
}

impl RepositoryArea {
    pub fn entry_count(&self) -> usize {
        match self {
            Self::Listing(entries) => entries.len(),
            Self::Blank | Self::NoRepositories => 0,
        }
    }

    pub fn entries(&self) -> &[String] {
        match self {
            Self::Listing(entries) => entries,
            Self::Blank | Self::NoRepositories => &[],
        }
    }

    pub fn markup(&self) -> String {
        match self {
            Self::Blank => String::new(),
            Self::NoRepositories => format!(r#"<div class="empty">{NO_REPOSITORIES}</div>"#),
            Self::Listing(entries) => {
                let mut html = String::from(
                    "<div class=\"heading\">Repositories</div>\n<ul class=\"repositories\">\n",
                );
                for entry in entries {
                    html.push_str(entry);
                    html.push('\n');
                }
                html.push_str("</ul>");
                html
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryRender {
    /// The first page was empty; no further pages should be offered.
    NoRepositories,
    Entries(usize),
}

/// Paints one page of repositories. With `append` the entries are added after the ones
/// already shown; otherwise the area is replaced.
pub fn render_repositories(
    area: &mut RepositoryArea,
    repos: &[RepositorySummary],
    append: bool,
) -> RepositoryRender {
    if repos.is_empty() {
        if append {
            return RepositoryRender::Entries(0);
        }
        *area = RepositoryArea::NoRepositories;
        return RepositoryRender::NoRepositories;
    }

    let rendered: Vec<String> = repos.iter().map(render_repository).collect();
    match area {
        RepositoryArea::Listing(entries) if append => entries.extend(rendered),
        other => *other = RepositoryArea::Listing(rendered),
    }
    RepositoryRender::Entries(repos.len())
}

/// Standalone page holding everything currently visible.
pub fn render_document(view: &LookupView) -> String {
    let mut body = String::new();

    if view.loading {
        body.push_str("  <div class=\"loading-indicator\">Loading...</div>\n");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(
            body,
            "  <div class=\"error-message\">{}</div>",
            encode_minimal(error)
        );
    }
    if let Some(card) = &view.profile_card {
        let _ = writeln!(body, "  <section class=\"card\">\n{card}\n  </section>");
    }
    if let Some(url) = view.heatmap.visible_url() {
        let _ = writeln!(
            body,
            "  <section class=\"contributions\"><img src=\"{}\" alt=\"Contributions\" class=\"contribution-img\" /></section>",
            encode_minimal(url)
        );
    }
    if view.repositories != RepositoryArea::Blank {
        let _ = writeln!(
            body,
            "  <section class=\"repos-list\">\n{}\n  </section>",
            view.repositories.markup()
        );
    }
    if view.show_more {
        body.push_str("  <button class=\"show-more\">Show more</button>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\" />\n  <title>MonoHub Lookup</title>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
