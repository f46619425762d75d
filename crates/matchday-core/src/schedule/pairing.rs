// Circle-method round-robin pairings.

use tracing::debug;

/// Placeholder opponent padded onto odd-sized rosters. Pairings against it
/// are byes and never become fixtures.
pub const BYE: &str = "BYE";

/// A home/away pairing in one round of the circle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    /// Zero-based round number.
    pub round: usize,
    /// Position of the home side in the circle for this round.
    pub position: usize,
    pub home: String,
    pub away: String,
}

/// Generate one full round-robin cycle with the circle method.
///
/// Index 0 stays fixed; after every round the last team moves to index 1.
/// With `n` teams (after BYE padding) there are `n - 1` rounds and position
/// `i` meets position `n - 1 - i`. Pairings involving the BYE are dropped,
/// so odd rosters give each team exactly one empty round.
pub fn round_robin_rounds(teams: &[String]) -> Vec<Vec<Pairing>> {
    let mut circle: Vec<String> = teams.to_vec();
    if circle.len() % 2 != 0 {
        circle.push(BYE.to_string());
    }

    let n = circle.len();
    if n < 2 {
        return Vec::new();
    }

    let mut rounds = Vec::with_capacity(n - 1);
    for round in 0..n - 1 {
        let mut pairings = Vec::with_capacity(n / 2);
        for position in 0..n / 2 {
            let home = &circle[position];
            let away = &circle[n - 1 - position];
            if home == BYE || away == BYE {
                debug!("round {round}: bye for {}", if home == BYE { away } else { home });
                continue;
            }
            pairings.push(Pairing {
                round,
                position,
                home: home.clone(),
                away: away.clone(),
            });
        }
        rounds.push(pairings);

        if let Some(last) = circle.pop() {
            circle.insert(1, last);
        }
    }

    rounds
}
