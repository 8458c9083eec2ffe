//! Client identity selection.
//!
//! Each fetch presents one of a fixed pool of desktop browser User-Agent
//! strings, chosen uniformly at random.

use rand::seq::IndexedRandom;

/// Pool of User-Agent strings presented to the search provider.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.7; rv:11.0) Gecko/20100101 Firefox/11.0",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:22.0) Gecko/20100101 Firefox/22.0",
    "Mozilla/5.0 (Windows NT 6.1; rv:11.0) Gecko/20100101 Firefox/11.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_7_4) AppleWebKit/536.5 (KHTML, like Gecko) \
     Chrome/19.0.1084.46 Safari/536.5",
    "Mozilla/5.0 (Windows; Windows NT 6.1) AppleWebKit/536.5 (KHTML, like Gecko) \
     Chrome/19.0.1084.46 Safari/536.5",
];

/// Pick a User-Agent uniformly at random from [`USER_AGENTS`].
pub fn random_user_agent() -> &'static str {
    USER_AGENTS.choose(&mut rand::rng()).copied().unwrap_or(USER_AGENTS[0])
}
