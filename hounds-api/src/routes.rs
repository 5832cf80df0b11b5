//! HTTP handlers and JSON models.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use hounds_core::{Cell, GameError, Match, MatchId, Phase, PieceKind, Player, PlayerId};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::error::ApiError;
use crate::store::Store;

pub const API_PREFIX: &str = "/hareandhounds/api/games";

/// Shared application state
pub struct AppStateInner {
    pub store: Store,
}

pub type AppState = Arc<AppStateInner>;

// =============================================================================
// JSON Models
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub piece_type: PieceKind,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub player_id: String,
    pub from_x: i32,
    pub from_y: i32,
    pub to_x: i32,
    pub to_y: i32,
    /// Defaults to the player's own side.
    #[serde(default)]
    pub piece_type: Option<PieceKind>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerModel {
    pub game_id: String,
    pub player_id: String,
    pub piece_type: PieceKind,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct StateModel {
    pub state: Phase,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PieceModel {
    pub piece_type: PieceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u8>,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoveModel {
    pub from_x: i32,
    pub from_y: i32,
    pub to_x: i32,
    pub to_y: i32,
}

#[derive(Debug, Serialize)]
pub struct MovesModel {
    pub state: Phase,
    pub moves: Vec<MoveModel>,
}

#[derive(Debug, Serialize)]
pub struct HealthModel {
    pub status: &'static str,
    pub store: &'static str,
}

// =============================================================================
// Conversion Functions
// =============================================================================

fn player_to_model(game: MatchId, player: Player) -> PlayerModel {
    PlayerModel {
        game_id: game.to_string(),
        player_id: player.id.to_string(),
        piece_type: player.kind,
    }
}

fn board_to_model(m: &Match) -> Vec<PieceModel> {
    m.board()
        .iter()
        .map(|piece| PieceModel {
            piece_type: piece.kind(),
            index: piece.id.hound_index(),
            x: piece.cell.x,
            y: piece.cell.y,
        })
        .collect()
}

/// Unparseable ids can never name a stored match.
fn parse_game_id(raw: &str) -> Result<MatchId, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound(raw.to_string()))
}

// =============================================================================
// API Endpoints
// =============================================================================

pub async fn create_game(
    State(state): State<AppState>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PlayerModel>), ApiError> {
    let Json(req) = payload?;
    let m = Match::create(req.piece_type);
    state.store.insert(&m)?;

    info!(game = %m.id(), piece = %req.piece_type, "created game");
    Ok((StatusCode::CREATED, Json(player_to_model(m.id(), m.creator()))))
}

pub async fn join_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<PlayerModel>, ApiError> {
    let id = parse_game_id(&game_id)?;
    let player = state.store.update(id, |m| m.join().map_err(ApiError::from))?;

    info!(game = %id, piece = %player.kind, "second player joined");
    Ok(Json(player_to_model(id, player)))
}

pub async fn get_state(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<StateModel>, ApiError> {
    let m = state.store.load(parse_game_id(&game_id)?)?;
    Ok(Json(StateModel { state: m.phase() }))
}

pub async fn get_board(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<Vec<PieceModel>>, ApiError> {
    let m = state.store.load(parse_game_id(&game_id)?)?;
    Ok(Json(board_to_model(&m)))
}

pub async fn get_moves(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<MovesModel>, ApiError> {
    let m = state.store.load(parse_game_id(&game_id)?)?;
    let moves = m
        .legal_moves()
        .into_iter()
        .map(|mv| MoveModel {
            from_x: mv.from.x,
            from_y: mv.from.y,
            to_x: mv.to.x,
            to_y: mv.to.y,
        })
        .collect();
    Ok(Json(MovesModel {
        state: m.phase(),
        moves,
    }))
}

pub async fn make_move(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<PlayerModel>, ApiError> {
    let id = parse_game_id(&game_id)?;
    let Json(req) = payload?;
    let from = Cell::new(req.from_x, req.from_y);
    let to = Cell::new(req.to_x, req.to_y);

    let (player, phase) = state.store.update(id, |m| {
        // Finished or unjoined matches are reported before the player id is looked at.
        m.expect_move()?;
        let player_id: PlayerId = req.player_id.parse().map_err(|_| GameError::UnknownPlayer)?;
        let kind = match req.piece_type {
            Some(kind) => kind,
            None => m.player(player_id).ok_or(GameError::UnknownPlayer)?.kind,
        };
        let player = m.submit_move(player_id, kind, from, to)?;
        Ok::<_, ApiError>((player, m.phase()))
    })?;

    info!(game = %id, piece = %player.kind, %from, %to, next = %phase, "move applied");
    if let Some(winner) = phase.winner() {
        info!(game = %id, %winner, outcome = %phase, "match finished");
    }
    Ok(Json(player_to_model(id, player)))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthModel> {
    Json(HealthModel {
        status: "ok",
        store: state.store.kind(),
    })
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let games = Router::new()
        .route("/", post(create_game))
        .route("/{game_id}", put(join_game))
        .route("/{game_id}/state", get(get_state))
        .route("/{game_id}/board", get(get_board))
        .route("/{game_id}/moves", get(get_moves))
        .route("/{game_id}/turns", post(make_move));

    Router::new()
        .nest(API_PREFIX, games)
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::sqlite::SqliteStore;
    use hounds_core::IllegalMove;

    fn memory_state() -> AppState {
        Arc::new(AppStateInner {
            store: Store::Memory(MemoryStore::new()),
        })
    }

    fn sqlite_state() -> AppState {
        Arc::new(AppStateInner {
            store: Store::Sqlite(SqliteStore::open_in_memory().unwrap()),
        })
    }

    async fn create(state: &AppState, kind: PieceKind) -> PlayerModel {
        let (status, Json(model)) = create_game(
            State(state.clone()),
            Ok(Json(CreateRequest { piece_type: kind })),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        model
    }

    async fn join(state: &AppState, game_id: &str) -> Result<PlayerModel, ApiError> {
        join_game(State(state.clone()), Path(game_id.to_string()))
            .await
            .map(|Json(m)| m)
    }

    async fn phase(state: &AppState, game_id: &str) -> Phase {
        let Json(model) = get_state(State(state.clone()), Path(game_id.to_string()))
            .await
            .unwrap();
        model.state
    }

    async fn step(
        state: &AppState,
        game_id: &str,
        player: &PlayerModel,
        from: (i32, i32),
        to: (i32, i32),
    ) -> Result<PlayerModel, ApiError> {
        let req = MoveRequest {
            player_id: player.player_id.clone(),
            from_x: from.0,
            from_y: from.1,
            to_x: to.0,
            to_y: to.1,
            piece_type: None,
        };
        make_move(State(state.clone()), Path(game_id.to_string()), Ok(Json(req)))
            .await
            .map(|Json(m)| m)
    }

    #[tokio::test]
    async fn test_create_then_join() {
        for state in [memory_state(), sqlite_state()] {
            let hounds = create(&state, PieceKind::Hound).await;
            assert_eq!(hounds.piece_type, PieceKind::Hound);
            assert_eq!(phase(&state, &hounds.game_id).await, Phase::AwaitingSecondPlayer);

            let hare = join(&state, &hounds.game_id).await.unwrap();
            assert_eq!(hare.piece_type, PieceKind::Hare);
            assert_eq!(hare.game_id, hounds.game_id);
            assert_ne!(hare.player_id, hounds.player_id);
            assert_eq!(phase(&state, &hounds.game_id).await, Phase::HoundTurn);

            let err = join(&state, &hounds.game_id).await.unwrap_err();
            assert_eq!(err.status(), StatusCode::GONE);
        }
    }

    #[tokio::test]
    async fn test_unknown_game() {
        let state = memory_state();
        let err = join(&state, "not-a-uuid").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = get_board(State(state.clone()), Path(MatchId::new().to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "INVALID_GAME_ID");
    }

    #[tokio::test]
    async fn test_board_listing() {
        let state = memory_state();
        let hounds = create(&state, PieceKind::Hound).await;

        let Json(first) = get_board(State(state.clone()), Path(hounds.game_id.clone()))
            .await
            .unwrap();
        let Json(second) = get_board(State(state.clone()), Path(hounds.game_id.clone()))
            .await
            .unwrap();
        assert_eq!(first, second);

        assert_eq!(first.len(), 4);
        assert_eq!(
            first[1],
            PieceModel {
                piece_type: PieceKind::Hound,
                index: Some(1),
                x: 0,
                y: 1,
            }
        );
        assert_eq!(
            first[3],
            PieceModel {
                piece_type: PieceKind::Hare,
                index: None,
                x: 4,
                y: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_board_json_shape() {
        let piece = PieceModel {
            piece_type: PieceKind::Hare,
            index: None,
            x: 4,
            y: 1,
        };
        let json = serde_json::to_value(&piece).unwrap();
        assert_eq!(json, serde_json::json!({ "pieceType": "HARE", "x": 4, "y": 1 }));
    }

    #[tokio::test]
    async fn test_moves_and_turns() {
        for state in [memory_state(), sqlite_state()] {
            let hounds = create(&state, PieceKind::Hound).await;
            let game = hounds.game_id.clone();
            let hare = join(&state, &game).await.unwrap();

            let err = step(&state, &game, &hare, (4, 1), (3, 1)).await.unwrap_err();
            assert_eq!(err.reason(), "INCORRECT_TURN");
            assert_eq!(phase(&state, &game).await, Phase::HoundTurn);

            let moved = step(&state, &game, &hounds, (0, 1), (1, 1)).await.unwrap();
            assert_eq!(moved, hounds);
            assert_eq!(phase(&state, &game).await, Phase::HareTurn);

            step(&state, &game, &hare, (4, 1), (3, 0)).await.unwrap();
            step(&state, &game, &hounds, (1, 1), (2, 1)).await.unwrap();
            assert_eq!(phase(&state, &game).await, Phase::HareTurn);
        }
    }

    #[tokio::test]
    async fn test_illegal_move_rejected() {
        let state = sqlite_state();
        let hounds = create(&state, PieceKind::Hound).await;
        let game = hounds.game_id.clone();
        join(&state, &game).await.unwrap();

        let err = step(&state, &game, &hounds, (1, 0), (3, 0)).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Game(GameError::IllegalMove(IllegalMove::DestinationUnreachable))
        ));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let Json(board) = get_board(State(state.clone()), Path(game.clone())).await.unwrap();
        assert_eq!((board[0].x, board[0].y), (1, 0));
    }

    #[tokio::test]
    async fn test_unknown_player() {
        let state = memory_state();
        let hounds = create(&state, PieceKind::Hound).await;
        let game = hounds.game_id.clone();
        join(&state, &game).await.unwrap();

        let stranger = PlayerModel {
            game_id: game.clone(),
            player_id: PlayerId::new().to_string(),
            piece_type: PieceKind::Hound,
        };
        let err = step(&state, &game, &stranger, (0, 1), (1, 1)).await.unwrap_err();
        assert_eq!(err.reason(), "INVALID_PLAYER_ID");

        let garbage = PlayerModel {
            player_id: "hound_player".to_string(),
            ..stranger
        };
        let err = step(&state, &game, &garbage, (0, 1), (1, 1)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_finished_match_reported_before_player() {
        for state in [memory_state(), sqlite_state()] {
            let hounds = create(&state, PieceKind::Hound).await;
            let game = hounds.game_id.clone();
            let hare = join(&state, &game).await.unwrap();

            // Hounds pin the hare on the right edge.
            let script: [(&PlayerModel, (i32, i32), (i32, i32)); 13] = [
                (&hounds, (1, 0), (2, 0)),
                (&hare, (4, 1), (3, 1)),
                (&hounds, (2, 0), (3, 0)),
                (&hare, (3, 1), (4, 1)),
                (&hounds, (1, 2), (2, 2)),
                (&hare, (4, 1), (3, 1)),
                (&hounds, (2, 2), (3, 2)),
                (&hare, (3, 1), (4, 1)),
                (&hounds, (0, 1), (1, 1)),
                (&hare, (4, 1), (3, 1)),
                (&hounds, (1, 1), (2, 1)),
                (&hare, (3, 1), (4, 1)),
                (&hounds, (2, 1), (3, 1)),
            ];
            for (player, from, to) in script {
                step(&state, &game, player, from, to).await.unwrap();
            }
            assert_eq!(phase(&state, &game).await, Phase::HoundWins);

            let garbage = PlayerModel {
                player_id: "garbage".to_string(),
                ..hare.clone()
            };
            let err = step(&state, &game, &garbage, (4, 1), (3, 1)).await.unwrap_err();
            assert_eq!(err.reason(), "GAME_FINISHED");

            let stranger = PlayerModel {
                player_id: PlayerId::new().to_string(),
                ..hare.clone()
            };
            let err = step(&state, &game, &stranger, (4, 1), (3, 1)).await.unwrap_err();
            assert_eq!(err.reason(), "GAME_FINISHED");
        }
    }

    #[tokio::test]
    async fn test_unjoined_match_reported_before_player() {
        let state = memory_state();
        let hounds = create(&state, PieceKind::Hound).await;
        let garbage = PlayerModel {
            player_id: "garbage".to_string(),
            ..hounds.clone()
        };
        let err = step(&state, &hounds.game_id, &garbage, (0, 1), (1, 1)).await.unwrap_err();
        assert_eq!(err.reason(), "INCORRECT_TURN");
    }

    #[tokio::test]
    async fn test_legal_moves_listing() {
        let state = memory_state();
        let hounds = create(&state, PieceKind::Hound).await;
        let game = hounds.game_id.clone();

        let Json(before_join) = get_moves(State(state.clone()), Path(game.clone())).await.unwrap();
        assert!(before_join.moves.is_empty());

        join(&state, &game).await.unwrap();
        let Json(listing) = get_moves(State(state.clone()), Path(game.clone())).await.unwrap();
        assert_eq!(listing.state, Phase::HoundTurn);
        assert_eq!(listing.moves.len(), 7);
        assert!(listing.moves.contains(&MoveModel {
            from_x: 0,
            from_y: 1,
            to_x: 1,
            to_y: 1,
        }));
    }

    #[tokio::test]
    async fn test_request_json_names() {
        let req: MoveRequest = serde_json::from_value(serde_json::json!({
            "playerId": "p",
            "fromX": 0,
            "fromY": 1,
            "toX": 1,
            "toY": 1,
        }))
        .unwrap();
        assert_eq!((req.from_x, req.from_y, req.to_x, req.to_y), (0, 1, 1, 1));
        assert_eq!(req.piece_type, None);

        let req: CreateRequest = serde_json::from_str(r#"{"pieceType":"HARE"}"#).unwrap();
        assert_eq!(req.piece_type, PieceKind::Hare);
        assert!(serde_json::from_str::<CreateRequest>(r#"{"pieceType":"FOX"}"#).is_err());
    }

    #[tokio::test]
    async fn test_health() {
        let Json(model) = health(State(sqlite_state())).await;
        assert_eq!(model.status, "ok");
        assert_eq!(model.store, "sqlite");
    }
}
