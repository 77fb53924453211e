//! Message types exchanged with the robot.
//!
//! Every message is one variant of the closed [`Message`] enum. Each
//! variant belongs to exactly one [`MessageKind`], and each kind owns
//! one leading identifier character on the wire.
//!
//! Payload structs keep their fields private and validate them in their
//! constructors: if you hold a `Message`, it can be encoded. There is no
//! way to build one that would produce malformed wire output.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Direction, Point, ProtocolError};

// ---------------------------------------------------------------------------
// MessageKind
// ---------------------------------------------------------------------------

/// The six message categories of the robot protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    Location,
    Warning,
    Done,
    Movement,
    End,
    StateChange,
}

/// Identifier character of each kind, in declaration order.
const IDENTIFIERS: [(MessageKind, char); 6] = [
    (MessageKind::Location, 'L'),
    (MessageKind::Warning, 'W'),
    (MessageKind::Done, 'D'),
    (MessageKind::Movement, 'M'),
    (MessageKind::End, 'E'),
    (MessageKind::StateChange, 'S'),
];

impl MessageKind {
    /// All kinds, in declaration order.
    pub const ALL: [MessageKind; 6] = [
        MessageKind::Location,
        MessageKind::Warning,
        MessageKind::Done,
        MessageKind::Movement,
        MessageKind::End,
        MessageKind::StateChange,
    ];

    /// The leading character of this kind's wire format.
    pub fn identifier(self) -> char {
        IDENTIFIERS[self as usize].1
    }

    /// The kind whose wire format starts with `c`, if any.
    pub fn from_identifier(c: char) -> Option<MessageKind> {
        IDENTIFIERS
            .iter()
            .find(|(_, id)| *id == c)
            .map(|(kind, _)| *kind)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageKind::Location => "LOCATION",
            MessageKind::Warning => "WARNING",
            MessageKind::Done => "DONE",
            MessageKind::Movement => "MOVEMENT",
            MessageKind::End => "END",
            MessageKind::StateChange => "STATE_CHANGE",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Digit
// ---------------------------------------------------------------------------

/// A single decimal digit, `0..=9`.
///
/// Every numeric field of the grammar is one character wide, so this is
/// the only numeric type a payload stores. Serde goes through `u8` and
/// re-validates on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl Digit {
    pub const MAX: u8 = 9;

    /// Returns `None` unless `value` is in `0..=9`.
    pub fn new(value: i32) -> Option<Digit> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(Digit)
    }

    /// Parses an ASCII digit character.
    pub fn from_char(c: char) -> Option<Digit> {
        c.to_digit(10).map(|d| Digit(d as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl TryFrom<u8> for Digit {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Digit::new(i32::from(value)).ok_or_else(|| format!("{value} is not a single decimal digit"))
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> u8 {
        digit.0
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validates one coordinate of a grid point for a digit-wide field.
fn coordinate(kind: MessageKind, axis: &str, value: i32) -> Result<Digit, ProtocolError> {
    Digit::new(value).ok_or_else(|| {
        ProtocolError::malformed(kind, format!("{axis} {value} does not fit in a single digit"))
    })
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// The robot warns that `instructions_number` instructions are pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Warning {
    instructions: Digit,
}

impl Warning {
    /// # Errors
    /// `MalformedPayload` unless `instructions_number` is in `0..=9`.
    pub fn new(instructions_number: i32) -> Result<Self, ProtocolError> {
        let instructions = Digit::new(instructions_number).ok_or_else(|| {
            ProtocolError::malformed(
                MessageKind::Warning,
                format!("instruction count {instructions_number} is not in 0..=9"),
            )
        })?;
        Ok(Self { instructions })
    }

    pub(crate) fn from_digit(instructions: Digit) -> Self {
        Self { instructions }
    }

    pub fn instructions_number(&self) -> u8 {
        self.instructions.get()
    }

    pub(crate) fn digit(&self) -> Digit {
        self.instructions
    }
}

/// The robot reports the cell it currently occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    row: Digit,
    col: Digit,
}

impl Location {
    /// # Errors
    /// `MalformedPayload` unless both coordinates are in `0..=9`.
    pub fn new(robot: Point) -> Result<Self, ProtocolError> {
        Ok(Self {
            row: coordinate(MessageKind::Location, "row", robot.row)?,
            col: coordinate(MessageKind::Location, "column", robot.col)?,
        })
    }

    pub(crate) fn from_digits(row: Digit, col: Digit) -> Self {
        Self { row, col }
    }

    pub fn robot(&self) -> Point {
        Point::new(i32::from(self.row.get()), i32::from(self.col.get()))
    }

    pub(crate) fn digits(&self) -> (Digit, Digit) {
        (self.row, self.col)
    }
}

/// The robot reports its cell and a block detected in front of it.
///
/// Shares the `L` identifier with [`Location`] on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockDetected {
    robot: Location,
    block: Location,
}

impl BlockDetected {
    /// # Errors
    /// `MalformedPayload` unless all four coordinates are in `0..=9`.
    pub fn new(robot: Point, block: Point) -> Result<Self, ProtocolError> {
        Ok(Self {
            robot: Location::new(robot)?,
            block: Location::new(block)?,
        })
    }

    pub(crate) fn from_locations(robot: Location, block: Location) -> Self {
        Self { robot, block }
    }

    pub fn robot(&self) -> Point {
        self.robot.robot()
    }

    pub fn block(&self) -> Point {
        self.block.robot()
    }

    pub(crate) fn locations(&self) -> (Location, Location) {
        (self.robot, self.block)
    }
}

/// Move-type code carried by a [`Movement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MovementType {
    /// The robot physically moves to the next cell.
    IsMove = 0,
    /// The robot only turns to face `direction`.
    IsNotMove = 1,
}

impl MovementType {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<MovementType> {
        match code {
            0 => Some(MovementType::IsMove),
            1 => Some(MovementType::IsNotMove),
            _ => None,
        }
    }
}

/// A command for the robot to face or move towards `direction`.
///
/// Every combination of fields is valid, so these are public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Movement {
    pub direction: Direction,
    pub is_move: bool,
}

impl Movement {
    pub fn new(direction: Direction, is_move: bool) -> Self {
        Self { direction, is_move }
    }

    pub fn movement_type(&self) -> MovementType {
        if self.is_move {
            MovementType::IsMove
        } else {
            MovementType::IsNotMove
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single protocol message.
///
/// Messages are immutable values. The wire form is never stored: call
/// [`encode`](crate::encode) (or use `Display`) to recompute it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    Warning(Warning),
    Done,
    Location(Location),
    BlockDetected(BlockDetected),
    Movement(Movement),
    End,
    StateChange,
}

impl Message {
    /// # Errors
    /// `MalformedPayload` unless `instructions_number` is in `0..=9`.
    pub fn warning(instructions_number: i32) -> Result<Self, ProtocolError> {
        Warning::new(instructions_number).map(Message::Warning)
    }

    /// # Errors
    /// `MalformedPayload` unless both coordinates are in `0..=9`.
    pub fn location(robot: Point) -> Result<Self, ProtocolError> {
        Location::new(robot).map(Message::Location)
    }

    /// # Errors
    /// `MalformedPayload` unless all coordinates are in `0..=9`.
    pub fn block_detected(robot: Point, block: Point) -> Result<Self, ProtocolError> {
        BlockDetected::new(robot, block).map(Message::BlockDetected)
    }

    pub fn movement(direction: Direction, is_move: bool) -> Self {
        Message::Movement(Movement::new(direction, is_move))
    }

    /// The kind this message belongs to.
    ///
    /// [`Message::BlockDetected`] is a `LOCATION`: it shares the
    /// identifier and is tried under the same slot of the trial order.
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Warning(_) => MessageKind::Warning,
            Message::Done => MessageKind::Done,
            Message::Location(_) | Message::BlockDetected(_) => MessageKind::Location,
            Message::Movement(_) => MessageKind::Movement,
            Message::End => MessageKind::End,
            Message::StateChange => MessageKind::StateChange,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::encode(self))
    }
}
