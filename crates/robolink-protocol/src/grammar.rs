//! The literal wire grammar of every message kind.
//!
//! ```text
//! WARNING       W<d>            d: instruction count 0-9
//! DONE          D
//! LOCATION      L<x><y>??       x: column, y: row
//!               L<x><y><bx><by> robot and detected block
//! MOVEMENT      M#<d><t>        d: direction 0-3, t: 0 move / 1 turn only
//! END           E#
//! STATE_CHANGE  S#E
//! ```
//!
//! Every rule is matched from the first byte of the token and stops as
//! soon as its last field is read. Anything after that is left to the
//! caller, so `"DL37??"` matches DONE and consumes one byte.

use crate::{
    BlockDetected, Digit, Direction, Location, Message, MessageKind, Movement, MovementType,
    Warning,
};

/// Field separator used by MOVEMENT, END and STATE_CHANGE.
pub const SEPARATOR: char = '#';

/// Literal terminator closing a plain LOCATION.
pub const LOCATION_TERMINATOR: &str = "??";

/// A grammar rule: returns the message and the number of bytes it
/// consumed, or `None` if the token does not start with this shape.
pub(crate) type Rule = fn(&str) -> Option<(Message, usize)>;

const LOCATION_RULES: &[Rule] = &[match_location, match_block_detected];
const WARNING_RULES: &[Rule] = &[match_warning];
const DONE_RULES: &[Rule] = &[match_done];
const MOVEMENT_RULES: &[Rule] = &[match_movement];
const END_RULES: &[Rule] = &[match_end];
const STATE_CHANGE_RULES: &[Rule] = &[match_state_change];

/// Rules attempted for each kind, in order.
///
/// LOCATION owns two shapes. They diverge at the fourth byte (`?` versus
/// a digit), so neither can shadow the other whichever goes first.
pub(crate) fn rules(kind: MessageKind) -> &'static [Rule] {
    match kind {
        MessageKind::Location => LOCATION_RULES,
        MessageKind::Warning => WARNING_RULES,
        MessageKind::Done => DONE_RULES,
        MessageKind::Movement => MOVEMENT_RULES,
        MessageKind::End => END_RULES,
        MessageKind::StateChange => STATE_CHANGE_RULES,
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Reads fixed-width fields from the front of a token.
struct Cursor<'a> {
    chars: std::str::Chars<'a>,
    consumed: usize,
}

impl<'a> Cursor<'a> {
    fn new(token: &'a str) -> Self {
        Self {
            chars: token.chars(),
            consumed: 0,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.consumed += c.len_utf8();
        Some(c)
    }

    fn literal(&mut self, expected: char) -> Option<()> {
        (self.bump()? == expected).then_some(())
    }

    fn literal_str(&mut self, expected: &str) -> Option<()> {
        expected.chars().try_for_each(|c| self.literal(c))
    }

    fn identifier(&mut self, kind: MessageKind) -> Option<()> {
        self.literal(kind.identifier())
    }

    fn digit(&mut self) -> Option<Digit> {
        Digit::from_char(self.bump()?)
    }

    fn finish(self, message: Message) -> Option<(Message, usize)> {
        Some((message, self.consumed))
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

fn match_warning(token: &str) -> Option<(Message, usize)> {
    let mut cur = Cursor::new(token);
    cur.identifier(MessageKind::Warning)?;
    let count = cur.digit()?;
    cur.finish(Message::Warning(Warning::from_digit(count)))
}

fn match_done(token: &str) -> Option<(Message, usize)> {
    let mut cur = Cursor::new(token);
    cur.identifier(MessageKind::Done)?;
    cur.finish(Message::Done)
}

fn read_location(cur: &mut Cursor<'_>) -> Option<Location> {
    let col = cur.digit()?;
    let row = cur.digit()?;
    Some(Location::from_digits(row, col))
}

fn match_location(token: &str) -> Option<(Message, usize)> {
    let mut cur = Cursor::new(token);
    cur.identifier(MessageKind::Location)?;
    let robot = read_location(&mut cur)?;
    cur.literal_str(LOCATION_TERMINATOR)?;
    cur.finish(Message::Location(robot))
}

fn match_block_detected(token: &str) -> Option<(Message, usize)> {
    let mut cur = Cursor::new(token);
    cur.identifier(MessageKind::Location)?;
    let robot = read_location(&mut cur)?;
    let block = read_location(&mut cur)?;
    cur.finish(Message::BlockDetected(BlockDetected::from_locations(
        robot, block,
    )))
}

fn match_movement(token: &str) -> Option<(Message, usize)> {
    let mut cur = Cursor::new(token);
    cur.identifier(MessageKind::Movement)?;
    cur.literal(SEPARATOR)?;
    let direction = Direction::from_digit(cur.digit()?.get())?;
    let movement_type = MovementType::from_code(cur.digit()?.get())?;
    cur.finish(Message::Movement(Movement::new(
        direction,
        movement_type == MovementType::IsMove,
    )))
}

fn match_end(token: &str) -> Option<(Message, usize)> {
    let mut cur = Cursor::new(token);
    cur.identifier(MessageKind::End)?;
    cur.literal(SEPARATOR)?;
    cur.finish(Message::End)
}

fn match_state_change(token: &str) -> Option<(Message, usize)> {
    let mut cur = Cursor::new(token);
    cur.identifier(MessageKind::StateChange)?;
    cur.literal(SEPARATOR)?;
    cur.literal('E')?;
    cur.finish(Message::StateChange)
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

fn write_location(out: &mut String, location: &Location) {
    let (row, col) = location.digits();
    out.push(col.as_char());
    out.push(row.as_char());
}

/// Appends the wire form of `message` to `out`.
pub(crate) fn write(out: &mut String, message: &Message) {
    out.push(message.kind().identifier());
    match message {
        Message::Warning(warning) => out.push(warning.digit().as_char()),
        Message::Done => {}
        Message::Location(location) => {
            write_location(out, location);
            out.push_str(LOCATION_TERMINATOR);
        }
        Message::BlockDetected(detected) => {
            let (robot, block) = detected.locations();
            write_location(out, &robot);
            write_location(out, &block);
        }
        Message::Movement(movement) => {
            out.push(SEPARATOR);
            out.push(char::from(b'0' + movement.direction.digit()));
            out.push(char::from(b'0' + movement.movement_type().code()));
        }
        Message::End => out.push(SEPARATOR),
        Message::StateChange => {
            out.push(SEPARATOR);
            out.push('E');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    #[test]
    fn test_cursor_counts_bytes() {
        let mut cur = Cursor::new("M#01");
        assert_eq!(cur.bump(), Some('M'));
        assert_eq!(cur.bump(), Some('#'));
        assert_eq!(cur.consumed, 2);
    }

    #[test]
    fn test_rules_stop_at_last_field() {
        assert_eq!(match_done("DXYZ"), Some((Message::Done, 1)));
        assert_eq!(match_end("E#E#"), Some((Message::End, 2)));
    }

    #[test]
    fn test_location_reads_column_first() {
        let (msg, used) = match_location("L37??").unwrap();
        assert_eq!(used, 5);
        assert_eq!(msg, Message::location(Point::new(7, 3)).unwrap());
    }

    #[test]
    fn test_location_requires_terminator() {
        assert_eq!(match_location("L37?"), None);
        assert_eq!(match_location("L3712"), None);
    }

    #[test]
    fn test_block_detected_requires_four_digits() {
        assert_eq!(match_block_detected("L37??"), None);
        assert_eq!(match_block_detected("L371"), None);
        let (msg, used) = match_block_detected("L3748").unwrap();
        assert_eq!(used, 5);
        let expected = Message::block_detected(Point::new(7, 3), Point::new(8, 4)).unwrap();
        assert_eq!(msg, expected);
    }

    #[test]
    fn test_movement_rejects_codes_outside_table() {
        assert_eq!(match_movement("M#40"), None);
        assert_eq!(match_movement("M#12"), None);
        assert_eq!(match_movement("M12"), None);
    }

    #[test]
    fn test_non_ascii_input_does_not_panic() {
        assert_eq!(match_warning("Wé"), None);
        assert_eq!(match_state_change("S#É"), None);
    }

    #[test]
    fn test_write_movement() {
        let mut out = String::new();
        write(&mut out, &Message::movement(Direction::Down, false));
        assert_eq!(out, "M#21");
    }
}
