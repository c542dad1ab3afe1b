use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// `(network, transport stream, service)` with optional padding.
regex!(SOURCE_ID_REGEX, r"^\(([ 0-9]+),([ 0-9]+),([ 0-9]+)\)$");
// `DiSEqC1(9750000, 10600000, 11700000, True)`
regex!(DISH_REGEX, r"^([^\(]+)\(([ 0-9]+),([ 0-9]+),([ 0-9]+),([^\)]+)\)$");
// Human readable orbital position without the hemisphere suffix, e.g. `19.2°`.
regex!(ORBITAL_REGEX, r"^(\d{1,3})\.(\d)°$");
