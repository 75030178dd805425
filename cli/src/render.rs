//! Terminal rendering for the ballot and the live results.

use std::fmt::Write as _;

use ballot_client::{messages, ResultsState};
use ballot_tally::{Dashboard, VoteResult};
use ballot_types::{CandidateRegistry, ChartColor, Role, CHART_COLORS};

/// Width of the proportional chart strip, in cells.
const STRIP_WIDTH: u64 = 40;
/// Width of a per-candidate bar at 100%.
const BAR_WIDTH: f64 = 20.0;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Glyphs used in place of colours, by palette position.
const MONO_GLYPHS: [char; 4] = ['█', '▓', '▒', '#'];

pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn header(&self) -> String {
        format!(
            "{} [{}]\n",
            self.bold(messages::APP_TITLE),
            messages::ANONYMOUS_TAG
        )
    }

    pub fn footer(&self) -> String {
        format!("{}\n", self.dim(messages::FOOTER))
    }

    /// Escape sequence to redraw from the top, empty without colour.
    pub fn clear(&self) -> &'static str {
        if self.color {
            CLEAR_SCREEN
        } else {
            ""
        }
    }

    /// The numbered choices for one office.
    pub fn choices(&self, registry: &CandidateRegistry, role: Role) -> String {
        let mut out = format!("{}\n", self.bold(&messages::selection_heading(role.label())));
        for candidate in registry.candidates(role) {
            let _ = writeln!(out, "  [{}] {}", candidate.id, candidate.display_name());
        }
        out
    }

    /// Both offices' candidates, for `ballot candidates`.
    pub fn candidates(&self, registry: &CandidateRegistry) -> String {
        Role::ALL
            .iter()
            .map(|role| self.choices(registry, *role))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn results(&self, state: &ResultsState) -> String {
        match state {
            ResultsState::Loading => format!("{}\n", messages::LOADING),
            ResultsState::Ready(dashboard) => self.dashboard(dashboard),
        }
    }

    pub fn dashboard(&self, dashboard: &Dashboard) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.bold(messages::RESULTS_HEADING));
        let _ = writeln!(out, "{}\n", messages::participants(dashboard.total_votes));
        for role in Role::ALL {
            out.push_str(&self.role_section(
                role,
                dashboard.results(role),
                dashboard.total_votes,
            ));
            out.push('\n');
        }
        let _ = writeln!(out, "{}", self.dim(messages::DISCLAIMER));
        out
    }

    fn role_section(&self, role: Role, results: &[VoteResult], total: u64) -> String {
        let mut out = format!("{}\n", self.bold(&messages::results_heading(role.label())));
        if total == 0 {
            let _ = writeln!(out, "  {}", messages::NO_DATA);
        } else {
            let _ = writeln!(out, "  {}", self.strip(results, total));
        }
        for (rank, result) in results.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {}  {}표 ({:.1}%)",
                rank + 1,
                result.display_name,
                result.count,
                result.percentage
            );
            let _ = writeln!(out, "     {}", self.bar(result));
        }
        out
    }

    /// One strip split by share of all participants.
    ///
    /// Votes for candidates not on the list leave the tail unfilled.
    fn strip(&self, results: &[VoteResult], total: u64) -> String {
        let mut out = String::new();
        let mut used = 0;
        for result in results {
            let cells = (result.count * STRIP_WIDTH / total).min(STRIP_WIDTH - used);
            if cells == 0 {
                continue;
            }
            used += cells;
            out.push_str(&self.fill(result.color, cells as usize));
        }
        out.push_str(&"·".repeat((STRIP_WIDTH - used) as usize));
        out
    }

    fn bar(&self, result: &VoteResult) -> String {
        let cells = ((result.percentage / 100.0 * BAR_WIDTH).round() as usize).min(BAR_WIDTH as usize);
        let mut out = self.fill(result.color, cells);
        out.push_str(&"·".repeat(BAR_WIDTH as usize - cells));
        out
    }

    fn fill(&self, color: ChartColor, cells: usize) -> String {
        if cells == 0 {
            return String::new();
        }
        if self.color {
            format!(
                "\x1b[38;2;{};{};{}m{}{RESET}",
                color.r,
                color.g,
                color.b,
                "█".repeat(cells)
            )
        } else {
            let glyph = CHART_COLORS
                .iter()
                .position(|c| *c == color)
                .map_or('█', |i| MONO_GLYPHS[i % MONO_GLYPHS.len()]);
            std::iter::repeat(glyph).take(cells).collect()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            format!("{BOLD}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_types::{NewVote, ServerTimestamp, Vote};

    fn votes(pairs: &[(&str, &str)]) -> Vec<Vote> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (p, v))| {
                NewVote::new((*p).into(), (*v).into()).stamp(ServerTimestamp::new(i as u64 + 1))
            })
            .collect()
    }

    fn dashboard(pairs: &[(&str, &str)]) -> Dashboard {
        Dashboard::from_votes(&CandidateRegistry::builtin(), &votes(pairs))
    }

    #[test]
    fn loading_state() {
        let out = Renderer::new(false).results(&ResultsState::Loading);
        assert_eq!(out, "실시간 집계 중입니다...\n");
    }

    #[test]
    fn empty_snapshot_shows_no_data() {
        let out = Renderer::new(false).dashboard(&dashboard(&[]));
        assert!(out.contains("현재까지 총 0명이 참여했습니다."));
        assert_eq!(out.matches("데이터 없음").count(), 2);
        assert!(out.contains("1. 기호 1번 한시우  0표 (0.0%)"));
        assert!(out.contains("본 결과는 실제 개표 결과와 다를 수 있는 단순 예측치입니다."));
    }

    #[test]
    fn ranked_lines_follow_tally_order() {
        let out = Renderer::new(false).dashboard(&dashboard(&[
            ("p2", "v1"),
            ("p1", "v1"),
            ("p2", "v3"),
            ("x9", "v1"),
        ]));
        let first = out.find("1. 기호 2번 김재광  2표 (50.0%)").unwrap();
        let second = out.find("2. 기호 1번 한시우  1표 (25.0%)").unwrap();
        assert!(first < second);
        assert!(out.contains("회장 후보 득표율"));
        assert!(out.contains("부회장 후보 득표율"));
        assert!(!out.contains("데이터 없음"));
    }

    #[test]
    fn strip_is_proportional_and_unfilled_for_unknown_ids() {
        let renderer = Renderer::new(false);
        let board = dashboard(&[("p1", "v1"), ("x9", "v1")]);
        let strip = renderer.strip(board.results(Role::President), board.total_votes);
        assert_eq!(strip.chars().count(), STRIP_WIDTH as usize);
        assert_eq!(strip.chars().filter(|c| *c == '█').count(), 20);
        assert_eq!(strip.chars().filter(|c| *c == '·').count(), 20);
    }

    #[test]
    fn mono_glyph_follows_list_position() {
        let renderer = Renderer::new(false);
        let board = dashboard(&[("p2", "v4")]);
        let strip = renderer.strip(board.results(Role::President), 1);
        assert!(strip.chars().all(|c| c == '▓'));
        let strip = renderer.strip(board.results(Role::VicePresident), 1);
        assert!(strip.chars().all(|c| c == '#'));
    }

    #[test]
    fn bar_tracks_percentage() {
        let renderer = Renderer::new(false);
        let board = dashboard(&[("p1", "v1"), ("p1", "v1"), ("p3", "v2"), ("p4", "v2")]);
        let leader = &board.results(Role::President)[0];
        let bar = renderer.bar(leader);
        assert_eq!(bar.chars().count(), BAR_WIDTH as usize);
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 10);
    }

    #[test]
    fn colour_output_uses_true_colour_escapes() {
        let out = Renderer::new(true).dashboard(&dashboard(&[("p1", "v2")]));
        assert!(out.contains("\x1b[38;2;59;130;246m"));
        assert!(out.contains("\x1b[38;2;239;68;68m"));
        assert!(out.contains(RESET));
    }

    #[test]
    fn plain_output_has_no_escapes() {
        let renderer = Renderer::new(false);
        let out = renderer.dashboard(&dashboard(&[("p1", "v2")]));
        assert!(!out.contains('\x1b'));
        assert!(!renderer.header().contains('\x1b'));
        assert_eq!(renderer.clear(), "");
    }

    #[test]
    fn candidate_listing() {
        let out = Renderer::new(false).candidates(&CandidateRegistry::builtin());
        assert!(out.contains("회장 후보 선택"));
        assert!(out.contains("  [p3] 기호 3번 장현준"));
        assert!(out.contains("  [v4] 기호 4번 장지현"));
    }
}
