use std::collections::HashMap;

use gh_api::models::Commit;
use serde::{Deserialize, Serialize};

/// Upper bound on commits considered by a single derivation.
pub const WINDOW_BOUND: usize = 100;

/// Per-author share of a bounded commit history. `total_commits` is the same
/// value in every record of a derivation and equals the sum of `commits`
/// across all records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoderImpact {
    pub user: String,
    pub commits: u32,
    pub total_commits: u32,
}

/// Counts commits per author login over the input window, in input order.
/// The listing operation already caps its window near 100, but the bound is
/// enforced here as well so a derivation never considers more.
///
/// Output is sorted ascending by commit count, surfacing low-impact authors
/// first; callers wanting the most impactful first reverse the list. Ties
/// keep whatever order the counting map yields.
pub fn compute_impacts(commits: &[Commit]) -> Vec<CoderImpact> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    let mut iterated: u32 = 0;

    for commit in commits {
        iterated += 1;
        *counts.entry(commit.author.login.as_str()).or_insert(0) += 1;
        if iterated as usize == WINDOW_BOUND {
            break;
        }
    }

    let mut impacts: Vec<CoderImpact> = counts
        .into_iter()
        .map(|(user, commits)| CoderImpact {
            user: user.to_string(),
            commits,
            total_commits: iterated,
        })
        .collect();
    impacts.sort_by_key(|impact| impact.commits);
    impacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use gh_api::models::User;

    fn commit_by(login: &str) -> Commit {
        Commit {
            author: User {
                login: login.to_string(),
                ..User::default()
            },
            ..Commit::default()
        }
    }

    #[test]
    fn counts_per_author_and_orders_ascending() {
        let commits: Vec<Commit> = ["alice", "bob", "alice", "bob", "alice"]
            .iter()
            .map(|login| commit_by(login))
            .collect();

        let impacts = compute_impacts(&commits);

        assert_eq!(impacts.len(), 2);
        assert_eq!(impacts[0].user, "bob");
        assert_eq!(impacts[0].commits, 2);
        assert_eq!(impacts[1].user, "alice");
        assert_eq!(impacts[1].commits, 3);
        for impact in &impacts {
            assert_eq!(impact.total_commits, 5);
        }
        assert_eq!(impacts.iter().map(|i| i.commits).sum::<u32>(), 5);
    }

    #[test]
    fn empty_window_yields_no_impacts() {
        assert!(compute_impacts(&[]).is_empty());
    }

    #[test]
    fn iteration_stops_at_the_window_bound() {
        let mut commits = vec![commit_by("alice"); 90];
        commits.extend(vec![commit_by("bob"); 30]);

        let impacts = compute_impacts(&commits);

        // 120 commits in, only the first 100 count: 90 alice + 10 bob.
        assert_eq!(impacts.iter().map(|i| i.commits).sum::<u32>(), 100);
        for impact in &impacts {
            assert_eq!(impact.total_commits, 100);
        }
        assert_eq!(impacts[0].user, "bob");
        assert_eq!(impacts[0].commits, 10);
        assert_eq!(impacts[1].user, "alice");
        assert_eq!(impacts[1].commits, 90);
    }

    #[test]
    fn single_author_takes_the_whole_window() {
        let commits = vec![commit_by("solo"); 4];
        let impacts = compute_impacts(&commits);
        assert_eq!(
            impacts,
            vec![CoderImpact {
                user: "solo".to_string(),
                commits: 4,
                total_commits: 4,
            }]
        );
    }
}
