//! 神奇 8 球的固定答案池

use rand::seq::SliceRandom;

pub const PHRASES: [&str; 20] = [
    "It is certain.",
    "It is decidedly so.",
    "Without a doubt.",
    "Yes definitely.",
    "You may rely on it.",
    "As I see it, yes.",
    "Most likely.",
    "Outlook good.",
    "Yes.",
    "Signs point to yes.",
    "Reply hazy, try again.",
    "Ask again later.",
    "Better not tell you now.",
    "Cannot predict now.",
    "Concentrate and ask again.",
    "Don't count on it.",
    "My reply is no.",
    "My sources say no.",
    "Outlook not so good.",
    "Very doubtful.",
];

pub fn random_phrase<R: rand::Rng + ?Sized>(rng: &mut R) -> &'static str {
    PHRASES.choose(rng).copied().unwrap_or("Ask again later.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_comes_from_the_pool() {
        let mut rng = rand::thread_rng();
        let phrase = random_phrase(&mut rng);
        assert!(PHRASES.contains(&phrase));
    }
}
