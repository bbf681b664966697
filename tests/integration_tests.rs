use quiz_relay_server::config::Config;
use quiz_relay_server::protocol::ServerMessage;
use quiz_relay_server::rate_limit::RestoreRateLimiter;
use quiz_relay_server::server::dispatch::dispatch;
use quiz_relay_server::server::QuizRelayServer;
use quiz_relay_server::websocket::connection::ConnectionState;
use tokio::sync::mpsc;

fn channel() -> (ConnectionState, mpsc::Receiver<quiz_relay_server::broadcast::BroadcastMessage>) {
    let (tx, rx) = mpsc::channel(32);
    (ConnectionState::new(tx), rx)
}

/// A full host-then-player session: create a room, have a player join,
/// run one question round, and tear the room down.
#[tokio::test]
async fn test_full_quiz_round_trip() {
    let server = QuizRelayServer::new(Config::default());
    let mut restore_limiter = RestoreRateLimiter::new();

    let (mut host, mut host_rx) = channel();
    dispatch(&server, &mut host, &mut restore_limiter, r#"{"type":"create_room"}"#).await;
    let room_id = match host_rx.recv().await.unwrap().as_ref() {
        ServerMessage::RoomCreated { room_id, .. } => room_id.clone(),
        other => panic!("expected room_created, got {other:?}"),
    };

    let (mut player, mut player_rx) = channel();
    let join_frame = format!(r#"{{"type":"join","roomCode":"{room_id}","playerName":"Eve"}}"#);
    dispatch(&server, &mut player, &mut restore_limiter, &join_frame).await;
    let player_session_id = match player_rx.recv().await.unwrap().as_ref() {
        ServerMessage::Joined { session_id, is_reconnect, .. } => {
            assert!(!is_reconnect);
            session_id.clone()
        }
        other => panic!("expected joined, got {other:?}"),
    };
    assert!(matches!(
        host_rx.recv().await.unwrap().as_ref(),
        ServerMessage::PlayerJoined { .. }
    ));

    let start_frame = r#"{"type":"start_question","question":"2+2?","options":["3","4"],"index":0,"total":1,"duration":30}"#;
    dispatch(&server, &mut host, &mut restore_limiter, start_frame).await;
    assert!(matches!(
        player_rx.recv().await.unwrap().as_ref(),
        ServerMessage::Question { .. }
    ));

    let answer_frame = r#"{"type":"submit_answer","answerData":[1]}"#;
    dispatch(&server, &mut player, &mut restore_limiter, answer_frame).await;
    match host_rx.recv().await.unwrap().as_ref() {
        ServerMessage::PlayerAnswered { answer_data, .. } => assert_eq!(answer_data, &vec![1i64]),
        other => panic!("expected player_answered, got {other:?}"),
    }

    let results_frame = format!(
        r#"{{"type":"send_results","correct":[1],"isFinal":true,"playerScores":{{"{player_session_id}":10}}}}"#
    );
    dispatch(&server, &mut host, &mut restore_limiter, &results_frame).await;
    match player_rx.recv().await.unwrap().as_ref() {
        ServerMessage::Result { player_score, is_final, .. } => {
            assert_eq!(*player_score, 10.0);
            assert!(is_final);
        }
        other => panic!("expected result, got {other:?}"),
    }

    dispatch(&server, &mut host, &mut restore_limiter, r#"{"type":"terminate"}"#).await;
    assert!(matches!(
        host_rx.recv().await.unwrap().as_ref(),
        ServerMessage::QuizTerminated
    ));
    assert!(matches!(
        player_rx.recv().await.unwrap().as_ref(),
        ServerMessage::QuizTerminated
    ));
}

/// A second channel trying to join a nonexistent room gets a recoverable
/// error frame rather than the connection being torn down.
#[tokio::test]
async fn test_join_unknown_room_returns_error_frame() {
    let server = QuizRelayServer::new(Config::default());
    let mut restore_limiter = RestoreRateLimiter::new();
    let (mut player, mut rx) = channel();

    let frame = r#"{"type":"join","roomCode":"ZZZZ","playerName":"Eve"}"#;
    dispatch(&server, &mut player, &mut restore_limiter, frame).await;

    match rx.recv().await.unwrap().as_ref() {
        ServerMessage::Error { message } => assert_eq!(message, "Raum nicht gefunden."),
        other => panic!("expected error, got {other:?}"),
    }
}

/// A host who reconnects with the same session id gets the room's
/// current player snapshot back.
#[tokio::test]
async fn test_host_reconnect_returns_player_snapshot() {
    let server = QuizRelayServer::new(Config::default());
    let mut restore_limiter = RestoreRateLimiter::new();

    let (mut host, mut host_rx) = channel();
    dispatch(&server, &mut host, &mut restore_limiter, r#"{"type":"create_room"}"#).await;
    let (room_id, session_id) = match host_rx.recv().await.unwrap().as_ref() {
        ServerMessage::RoomCreated { room_id, session_id } => {
            (room_id.clone(), session_id.clone())
        }
        other => panic!("expected room_created, got {other:?}"),
    };

    let (mut player, mut player_rx) = channel();
    let join_frame = format!(r#"{{"type":"join","roomCode":"{room_id}","playerName":"Eve"}}"#);
    dispatch(&server, &mut player, &mut restore_limiter, &join_frame).await;
    player_rx.recv().await.unwrap();
    host_rx.recv().await.unwrap();

    let (mut reconnecting_host, mut reconnect_rx) = channel();
    let reconnect_frame =
        format!(r#"{{"type":"reconnect_host","roomId":"{room_id}","sessionId":"{session_id}"}}"#);
    dispatch(&server, &mut reconnecting_host, &mut restore_limiter, &reconnect_frame).await;

    match reconnect_rx.recv().await.unwrap().as_ref() {
        ServerMessage::HostReconnected { players, is_restored, .. } => {
            assert_eq!(players.len(), 1);
            assert!(is_restored.is_none());
        }
        other => panic!("expected host_reconnected, got {other:?}"),
    }
    assert!(reconnecting_host.is_host);
}

/// `restore_room` against a room that is still alive under its original
/// host degenerates to a plain reconnect, with the room's live player
/// snapshot rather than the host-supplied one.
#[tokio::test]
async fn test_restore_room_with_matching_host_reconnects() {
    let server = QuizRelayServer::new(Config::default());
    let mut restore_limiter = RestoreRateLimiter::new();

    let (mut host, mut host_rx) = channel();
    dispatch(&server, &mut host, &mut restore_limiter, r#"{"type":"create_room"}"#).await;
    let (room_id, session_id) = match host_rx.recv().await.unwrap().as_ref() {
        ServerMessage::RoomCreated { room_id, session_id } => {
            (room_id.clone(), session_id.clone())
        }
        other => panic!("expected room_created, got {other:?}"),
    };

    let (mut player, mut player_rx) = channel();
    let join_frame = format!(r#"{{"type":"join","roomCode":"{room_id}","playerName":"Eve"}}"#);
    dispatch(&server, &mut player, &mut restore_limiter, &join_frame).await;
    player_rx.recv().await.unwrap();
    host_rx.recv().await.unwrap();

    let (mut restoring_host, mut restore_rx) = channel();
    let restore_frame = format!(
        r#"{{"type":"restore_room","roomId":"{room_id}","sessionId":"{session_id}","players":[]}}"#
    );
    dispatch(&server, &mut restoring_host, &mut restore_limiter, &restore_frame).await;

    match restore_rx.recv().await.unwrap().as_ref() {
        ServerMessage::HostReconnected { room_id: replied_room_id, players, is_restored } => {
            assert_eq!(replied_room_id, &room_id);
            assert_eq!(players.len(), 1, "the room's real live player, not the empty snapshot sent in");
            assert!(is_restored.is_none(), "a matching-host restore degenerates to a reconnect");
        }
        other => panic!("expected host_reconnected, got {other:?}"),
    }
    assert!(restoring_host.is_host);
}

/// `restore_room` against a room code that is live under a *different*
/// host mints a fresh room code and rebuilds the player table from the
/// host-supplied snapshot instead of failing.
#[tokio::test]
async fn test_restore_room_with_mismatched_host_mints_fresh_room() {
    let server = QuizRelayServer::new(Config::default());
    let mut restore_limiter = RestoreRateLimiter::new();

    let (mut other_host, mut other_host_rx) = channel();
    dispatch(&server, &mut other_host, &mut restore_limiter, r#"{"type":"create_room"}"#).await;
    let taken_room_id = match other_host_rx.recv().await.unwrap().as_ref() {
        ServerMessage::RoomCreated { room_id, .. } => room_id.clone(),
        other => panic!("expected room_created, got {other:?}"),
    };

    let (mut restoring_host, mut restore_rx) = channel();
    let restore_frame = format!(
        r#"{{"type":"restore_room","roomId":"{taken_room_id}","sessionId":"sess-deadbeef00","players":[{{"id":"sess-cafebabe00","name":"Bob","score":5}}]}}"#
    );
    dispatch(&server, &mut restoring_host, &mut restore_limiter, &restore_frame).await;

    match restore_rx.recv().await.unwrap().as_ref() {
        ServerMessage::HostReconnected { room_id: fresh_room_id, players, is_restored } => {
            assert_ne!(fresh_room_id, &taken_room_id, "a taken code must not be reused");
            assert_eq!(players.len(), 1);
            assert_eq!(players[0].name, "Bob");
            assert_eq!(players[0].score, 5.0);
            assert!(!players[0].is_connected, "a restored player starts disconnected until it rejoins");
            assert_eq!(*is_restored, Some(true));
        }
        other => panic!("expected host_reconnected, got {other:?}"),
    }
    assert!(restoring_host.is_host);
}
