use castellan::{
    analysis::Analysis,
    castling::{CastlingRight, CastlingRights, CastlingSide},
    coordinates::{File as BoardFile, Rank, Square},
    moves::Move,
    piece::{Color, Piece},
    position::{Position, PositionBuilder, PositionError},
};
use colored::*;
use serde::Deserialize;
use std::{collections::HashSet, fs::File, io::BufReader, path::PathBuf, time::Instant};
use thiserror::Error;

const EXIT_FAILURE: i32 = 1;

//======================================================================================================================
// Error handling
//======================================================================================================================

/// Errors that are related to the test harness.
#[derive(Error, Debug)]
enum TestHarnessError {
    #[error("Resource path not found: {0:?}")]
    ResourcePathNotFound(PathBuf),

    #[error("Cannot read the test data file ({0:?})")]
    CannotReadTestDataFile(PathBuf),

    #[error("Cannot parse the test data file: {0}")]
    CannotParseTestDataFile(#[from] serde_json::Error),
}

/// Errors that are related to the test data.
#[derive(Error, Debug)]
enum TestDataError {
    #[error("Cannot parse \"{0}\" as a square")]
    CannotParseSquare(String),

    #[error("Cannot parse \"{0}\" as a piece")]
    CannotParsePiece(String),

    #[error("Cannot parse \"{0}\" as a placement")]
    CannotParsePlacement(String),

    #[error("Cannot parse \"{0}\" as a color")]
    CannotParseColor(String),

    #[error("Cannot parse \"{0}\" as castling rights")]
    CannotParseCastlingRights(String),

    #[error("Cannot parse \"{0}\" as a file")]
    CannotParseFile(String),

    #[error("Missing captured piece for move with type Capture or PromotionCapture")]
    MissingCapturedPiece,

    #[error("Missing promotion piece for move with type Promotion or PromotionCapture")]
    MissingPromotionPiece,

    #[error("The position cannot be built: {0}")]
    CannotBuildPosition(#[from] PositionError),
}

/// Errors used when tests fail.
#[derive(Error, Debug)]
enum TestFailureError {
    #[error("Missing moves during move generation: {0:?}")]
    MissingMoves(HashSet<Move>),

    #[error("Extra moves during move generation: {0:?}")]
    ExtraMoves(HashSet<Move>),

    #[error("The cached move list changed between queries")]
    UnstableMoveList,

    #[error("The packed representation of {0} does not round-trip")]
    EncodingRoundTripFailed(Move),

    #[error("Applying {mv} left the {color} king capturable\n\nOriginal:\n{original}\n\nActual:\n{actual}\n")]
    KingLeftCapturable { mv: Move, color: Color, original: String, actual: String },

    #[error("Applying {mv} produced an inconsistent position\n\nActual:\n{actual}\n")]
    InconsistentDerivedPosition { mv: Move, actual: String },
}

/// Global errors for this module.
#[derive(Error, Debug)]
enum LegalMoveTestError {
    #[error("Test harness error: {}", .0)]
    TestHarnessError(#[from] TestHarnessError),

    #[error("Test data parsing error: {}", .0)]
    TestDataParsingError(#[from] TestDataError),

    #[error("---- {} ----\n{}", .test_name, .test_failure_error)]
    TestFailed { test_name: String, test_failure_error: TestFailureError },
}

//======================================================================================================================
// Test data structures
//======================================================================================================================

/// A test case for the legal move generator.
#[derive(Debug, Deserialize)]
struct Test {
    name: String,
    /// Placements like "Ra1": a piece letter followed by a square.
    pieces: Vec<String>,
    side_to_move: String,
    castling: String,
    en_passant_file: Option<String>,
    expected_moves: Vec<TestMove>,
}

/// The type of move in the test data.
#[derive(Debug, Deserialize)]
enum MoveType {
    Basic,
    Capture,
    KingSideCastle,
    QueenSideCastle,
    EnPassant,
    Promotion,
    PromotionCapture,
}

/// A move in the test data.
#[derive(Debug, Deserialize)]
struct TestMove {
    from: String,
    to: String,
    piece: char,
    #[serde(default)]
    capture: Option<char>,
    #[serde(default)]
    promotion: Option<char>,
    #[serde(rename = "type")]
    move_type: MoveType,
}

//======================================================================================================================
// Test data reading and parsing
//======================================================================================================================

fn parse_square(value: &str) -> Result<Square, TestDataError> {
    let error = || TestDataError::CannotParseSquare(value.to_string());
    let bytes = value.as_bytes();
    if bytes.len() != 2 {
        return Err(error());
    }
    let file = bytes[0].wrapping_sub(b'a');
    let rank = bytes[1].wrapping_sub(b'1');
    if file >= 8 || rank >= 8 {
        return Err(error());
    }
    Ok(Square::new(BoardFile::from(file), Rank::from(rank)))
}

fn parse_piece(value: char) -> Result<Piece, TestDataError> {
    Piece::from_char(value).ok_or_else(|| TestDataError::CannotParsePiece(value.to_string()))
}

fn parse_color(value: &str) -> Result<Color, TestDataError> {
    match value {
        "white" => Ok(Color::White),
        "black" => Ok(Color::Black),
        _ => Err(TestDataError::CannotParseColor(value.to_string())),
    }
}

fn parse_castling_rights(value: &str) -> Result<CastlingRights, TestDataError> {
    if value == "-" {
        return Ok(CastlingRights::empty());
    }
    let mut rights = CastlingRights::empty();
    for c in value.chars() {
        rights |= match c {
            'K' => CastlingRights::WHITE_KINGSIDE,
            'Q' => CastlingRights::WHITE_QUEENSIDE,
            'k' => CastlingRights::BLACK_KINGSIDE,
            'q' => CastlingRights::BLACK_QUEENSIDE,
            _ => return Err(TestDataError::CannotParseCastlingRights(value.to_string())),
        };
    }
    Ok(rights)
}

fn parse_file(value: &str) -> Result<BoardFile, TestDataError> {
    let bytes = value.as_bytes();
    if bytes.len() != 1 || bytes[0].wrapping_sub(b'a') >= 8 {
        return Err(TestDataError::CannotParseFile(value.to_string()));
    }
    Ok(BoardFile::from(bytes[0] - b'a'))
}

/// Builds the position a test case describes.
fn build_position(test: &Test) -> Result<Position, TestDataError> {
    let mut builder = PositionBuilder::new();
    for placement in &test.pieces {
        let error = || TestDataError::CannotParsePlacement(placement.clone());
        let (piece, square) = placement.split_at(placement.char_indices().nth(1).map(|(i, _)| i).ok_or_else(error)?);
        let piece = parse_piece(piece.chars().next().ok_or_else(error)?)?;
        builder.set_piece(parse_square(square)?, piece);
    }
    builder.set_side_to_move(parse_color(&test.side_to_move)?);
    builder.set_castling(parse_castling_rights(&test.castling)?);
    if let Some(file) = &test.en_passant_file {
        builder.set_en_passant(Some(parse_file(file)?));
    }
    Ok(builder.build()?)
}

/// Convert a `TestMove`, which is a move in the test data, to a `Move`.
impl TryFrom<&TestMove> for Move {
    type Error = LegalMoveTestError;

    fn try_from(value: &TestMove) -> Result<Self, Self::Error> {
        let from = parse_square(&value.from)?;
        let to = parse_square(&value.to)?;
        let piece = parse_piece(value.piece)?;
        let capture = value.capture.map(parse_piece).transpose()?.map(Piece::piece_type);
        let promotion = value.promotion.map(parse_piece).transpose()?.map(Piece::piece_type);

        Ok(match value.move_type {
            MoveType::Basic => Move::new(piece, from, to),
            MoveType::Capture => {
                Move::new_capture(piece, from, to, capture.ok_or(TestDataError::MissingCapturedPiece)?)
            }
            MoveType::KingSideCastle => {
                Move::new_castle(CastlingRight::new(piece.color(), CastlingSide::Kingside))
            }
            MoveType::QueenSideCastle => {
                Move::new_castle(CastlingRight::new(piece.color(), CastlingSide::Queenside))
            }
            MoveType::EnPassant => Move::new_en_passant(piece.color(), from, to),
            MoveType::Promotion => Move::new_promotion(
                piece.color(),
                from,
                to,
                promotion.ok_or(TestDataError::MissingPromotionPiece)?,
            ),
            MoveType::PromotionCapture => Move::new_capture_promotion(
                piece.color(),
                from,
                to,
                capture.ok_or(TestDataError::MissingCapturedPiece)?,
                promotion.ok_or(TestDataError::MissingPromotionPiece)?,
            ),
        })
    }
}

/// Read the tests data from the file.
fn read_tests_data() -> Result<Vec<Test>, LegalMoveTestError> {
    let tests_file_path = get_resource_path("assets/tests/legal_move_tests.json")?;
    let file = File::open(&tests_file_path).map_err(|_| TestHarnessError::CannotReadTestDataFile(tests_file_path))?;
    let reader = BufReader::new(file);
    let tests: Vec<Test> = serde_json::from_reader(reader).map_err(TestHarnessError::CannotParseTestDataFile)?;
    Ok(tests)
}

//======================================================================================================================
// Test harness
//======================================================================================================================

/// Compare two sets of moves and return the missing and extra moves.
fn compare_moves_set(expected: &[Move], actual: &[Move]) -> (HashSet<Move>, HashSet<Move>) {
    let expected_set: HashSet<_> = expected.iter().copied().collect();
    let actual_set: HashSet<_> = actual.iter().copied().collect();

    let missing: HashSet<_> = expected_set.difference(&actual_set).copied().collect();
    let extra: HashSet<_> = actual_set.difference(&expected_set).copied().collect();

    (missing, extra)
}

fn test_move_generation(test: &Test, position: &Position) -> Result<(), LegalMoveTestError> {
    let expected_moves: Result<Vec<Move>, LegalMoveTestError> =
        test.expected_moves.iter().map(Move::try_from).collect();
    let expected_moves = expected_moves?;

    let (missing, extra) = compare_moves_set(&expected_moves, position.legal_moves());

    if !missing.is_empty() {
        return Err(LegalMoveTestError::TestFailed {
            test_name: test.name.clone(),
            test_failure_error: TestFailureError::MissingMoves(missing),
        });
    }

    if !extra.is_empty() {
        return Err(LegalMoveTestError::TestFailed {
            test_name: test.name.clone(),
            test_failure_error: TestFailureError::ExtraMoves(extra),
        });
    }

    Ok(())
}

/// The cached list must be identical on every query of the same position.
fn test_cached_list_is_stable(test: &Test, position: &Position) -> Result<(), LegalMoveTestError> {
    if position.legal_moves() != position.legal_moves() {
        return Err(LegalMoveTestError::TestFailed {
            test_name: test.name.clone(),
            test_failure_error: TestFailureError::UnstableMoveList,
        });
    }
    Ok(())
}

/// Every generated move must survive a trip through its packed `u32` form.
fn test_encoding_round_trip(test: &Test, position: &Position) -> Result<(), LegalMoveTestError> {
    for &mv in position.legal_moves() {
        if Move::from(u32::from(mv)) != mv {
            return Err(LegalMoveTestError::TestFailed {
                test_name: test.name.clone(),
                test_failure_error: TestFailureError::EncodingRoundTripFailed(mv),
            });
        }
    }
    Ok(())
}

/// Applying any generated move must flip the side to move, record the move, and leave the mover's
/// king out of reach.
fn test_move_application(test: &Test, position: &Position) -> Result<(), LegalMoveTestError> {
    let mover = position.side_to_move();
    for &mv in position.legal_moves() {
        let next = position.apply(mv);

        if next.side_to_move() != mover.opposite() || next.last_move() != Some(mv) {
            return Err(LegalMoveTestError::TestFailed {
                test_name: test.name.clone(),
                test_failure_error: TestFailureError::InconsistentDerivedPosition {
                    mv,
                    actual: next.to_string(),
                },
            });
        }

        // Probe the derived position from the mover's point of view: the mover must not have left
        // their own king in check.
        let mut probe = PositionBuilder::from_position(&next);
        probe.set_en_passant(None).set_side_to_move(mover);
        let probe = probe.build().map_err(TestDataError::from)?;
        if Analysis::from_position(&probe).is_in_check() {
            return Err(LegalMoveTestError::TestFailed {
                test_name: test.name.clone(),
                test_failure_error: TestFailureError::KingLeftCapturable {
                    mv,
                    color: mover,
                    original: position.to_string(),
                    actual: next.to_string(),
                },
            });
        }
    }
    Ok(())
}

/// Run a single test case.
fn run_test(test: Test) -> Result<(), LegalMoveTestError> {
    let position = build_position(&test).map_err(LegalMoveTestError::from)?;
    test_move_generation(&test, &position)?;
    test_cached_list_is_stable(&test, &position)?;
    test_encoding_round_trip(&test, &position)?;
    test_move_application(&test, &position)?;
    Ok(())
}

/// Run all the tests.
fn run_tests() -> Result<(), LegalMoveTestError> {
    let tests = read_tests_data()?;

    println!("\nrunning {} tests", tests.len());

    let start = Instant::now();
    let mut passed = 0;
    let mut failed = 0;
    let mut failures: Vec<LegalMoveTestError> = Vec::new();
    for test in tests {
        print!("test {} ...", test.name);
        let result_string = match run_test(test) {
            Ok(_) => {
                passed += 1;
                "ok".green()
            }

            Err(LegalMoveTestError::TestFailed { test_name, test_failure_error }) => {
                failed += 1;
                failures.push(LegalMoveTestError::TestFailed { test_name, test_failure_error });
                "FAILED".red()
            }

            Err(_) => {
                failed += 1;
                "FAILED".red()
            }
        };
        println!(" {}", result_string);
    }
    let seconds = start.elapsed().as_secs_f32();

    for failure in failures {
        println!("\n{}", failure)
    }

    println!(
        "\ntest result: {}. {} passed; {} failed; finished in {:.2}s\n",
        if failed == 0 { "ok".green() } else { "FAILED".red() },
        passed,
        failed,
        seconds
    );

    if failed != 0 {
        std::process::exit(EXIT_FAILURE);
    }

    Ok(())
}

//======================================================================================================================
// Main function and helpers
//======================================================================================================================

/// Get the path to a resource file.
fn get_resource_path(relative_path: &str) -> Result<PathBuf, TestHarnessError> {
    let mut path = std::env::current_dir().map_err(|_| TestHarnessError::ResourcePathNotFound(PathBuf::new()))?;
    path.push(relative_path);

    if !path.exists() {
        return Err(TestHarnessError::ResourcePathNotFound(path));
    }

    Ok(path)
}

/// The main function for the test harness. It will run the tests and print any unexpected errors.
fn main() -> Result<(), LegalMoveTestError> {
    castellan::initialize();

    if let Err(error) = run_tests() {
        eprintln!("{}", error);
        std::process::exit(EXIT_FAILURE)
    }
    Ok(())
}
