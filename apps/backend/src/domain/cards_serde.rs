//! Serialization and deserialization for card types

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::cards_types::{Card, Rank, Suit, TrumpSuit};

// Suit serde
impl Serialize for Suit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = match self {
            Suit::Clubs => "CLUBS",
            Suit::Diamonds => "DIAMONDS",
            Suit::Hearts => "HEARTS",
            Suit::Spades => "SPADES",
        };
        serializer.serialize_str(s)
    }
}

impl<'de> Deserialize<'de> for Suit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "CLUBS" => Ok(Suit::Clubs),
            "DIAMONDS" => Ok(Suit::Diamonds),
            "HEARTS" => Ok(Suit::Hearts),
            "SPADES" => Ok(Suit::Spades),
            _ => Err(serde::de::Error::custom(format!("Invalid suit: {s}"))),
        }
    }
}

// TrumpSuit serde: plain suits as their suit name, trump class as "TRUMP"
impl Serialize for TrumpSuit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TrumpSuit::Plain(suit) => suit.serialize(serializer),
            TrumpSuit::Trump => serializer.serialize_str("TRUMP"),
        }
    }
}

impl<'de> Deserialize<'de> for TrumpSuit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "TRUMP" => Ok(TrumpSuit::Trump),
            "CLUBS" => Ok(TrumpSuit::Plain(Suit::Clubs)),
            "DIAMONDS" => Ok(TrumpSuit::Plain(Suit::Diamonds)),
            "HEARTS" => Ok(TrumpSuit::Plain(Suit::Hearts)),
            "SPADES" => Ok(TrumpSuit::Plain(Suit::Spades)),
            _ => Err(serde::de::Error::custom(format!("Invalid trump suit: {s}"))),
        }
    }
}

// Rank serde uses the single rank character ("2".."A")
impl Serialize for Rank {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut buf = [0u8; 4];
        serializer.serialize_str(super::cards_parsing::rank_char(*self).encode_utf8(&mut buf))
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Rank::ALL
            .into_iter()
            .find(|r| s.len() == 1 && s.starts_with(super::cards_parsing::rank_char(*r)))
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid rank: {s}")))
    }
}

// Card serde (compact 2-character format like "AS", "2C", "BJ")
impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Card>()
            .map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}
