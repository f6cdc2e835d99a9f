use battleship::session::{CloseReason, Direction};
use battleship::transport::{InMemoryTransport, Transport};
use battleship::{
    AiPlayer, CellState, GameStatus, Message, MessageType, Phase, RemoteGame, Role, SessionError,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

async fn next(peer: &mut InMemoryTransport) -> anyhow::Result<Message> {
    Ok(Message::from_envelope(&peer.recv().await?)?)
}

fn game(transport: InMemoryTransport, role: Role) -> RemoteGame {
    RemoteGame::new(Box::new(AiPlayer::new()), Box::new(transport), role)
}

async fn joined_guest(peer: &mut InMemoryTransport, transport: InMemoryTransport) -> RemoteGame {
    let mut guest = game(transport, Role::Guest);
    peer.send_message(&Message::GameStart).await.unwrap();
    guest.join_room("abcd").await.unwrap();
    assert_eq!(
        next(peer).await.unwrap(),
        Message::JoinRoom {
            code: "abcd".to_string()
        }
    );
    guest
}

#[tokio::test(flavor = "multi_thread")]
async fn test_host_wins_against_scripted_peer() -> anyhow::Result<()> {
    let (transport, mut peer) = InMemoryTransport::pair();
    let mut host = game(transport, Role::Host);
    let mut rng = SmallRng::seed_from_u64(4);

    peer.send_message(&Message::RoomCreated {
        code: "WXYZ".to_string(),
    })
    .await?;
    assert_eq!(host.create_room().await?, "WXYZ");
    assert_eq!(next(&mut peer).await?, Message::CreateRoom);

    peer.send_message(&Message::PlayerJoined).await?;
    peer.send_message(&Message::ShipsPlaced).await?;
    let script = tokio::spawn(async move {
        assert_eq!(next(&mut peer).await?, Message::ShipsPlaced);
        let (row, col) = match next(&mut peer).await? {
            Message::Attack { row, col } => (row, col),
            other => anyhow::bail!("expected attack, got {:?}", other),
        };
        peer.send_message(&Message::AttackResult {
            row,
            col,
            hit: false,
            sunk_ship_name: None,
        })
        .await?;
        // concede straight away
        peer.send_message(&Message::GameOver { you_won: true })
            .await?;
        Ok::<_, anyhow::Error>((peer, (row as usize, col as usize)))
    });

    let status = host.run(&mut rng).await?;
    let (mut peer, (row, col)) = script.await??;
    assert_eq!(status, GameStatus::Won);
    assert_eq!(host.session().phase(), &Phase::GameOver { won: true });
    assert_eq!(host.engine().target().cell(row, col), Some(CellState::Miss));
    assert_eq!(host.engine().board().ships().len(), 5);

    host.close().await;
    drop(host);
    assert!(peer.recv().await.is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_opponent_left_during_placement() -> anyhow::Result<()> {
    let (transport, mut peer) = InMemoryTransport::pair();
    let mut guest = joined_guest(&mut peer, transport).await;
    let mut rng = SmallRng::seed_from_u64(8);

    peer.send_message(&Message::OpponentLeft).await?;
    let err = guest.run(&mut rng).await.unwrap_err();
    assert!(err.to_string().contains("Opponent left"));
    assert_eq!(
        guest.session().phase(),
        &Phase::Closed(CloseReason::OpponentLeft)
    );
    // the fleet went down and was announced before the notice was read
    assert_eq!(next(&mut peer).await?, Message::ShipsPlaced);
    assert_eq!(guest.engine().board().ships().len(), 5);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_out_of_phase_message_is_rejected() -> anyhow::Result<()> {
    let (transport, mut peer) = InMemoryTransport::pair();
    let mut guest = joined_guest(&mut peer, transport).await;
    let mut rng = SmallRng::seed_from_u64(9);

    peer.send_message(&Message::ShipsPlaced).await?;
    // the guest never attacked, so a result has nothing to answer
    peer.send_message(&Message::AttackResult {
        row: 0,
        col: 0,
        hit: true,
        sunk_ship_name: Some("Destroyer".to_string()),
    })
    .await?;

    let err = guest.run(&mut rng).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<SessionError>(),
        Some(&SessionError::OutOfPhase {
            phase: "battle",
            message: MessageType::AttackResult,
            direction: Direction::Received,
        })
    );
    assert_eq!(guest.engine().target().count(CellState::Hit), 0);
    assert!(guest.engine().enemy_sunk().is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_join_closes_session() -> anyhow::Result<()> {
    let (transport, mut peer) = InMemoryTransport::pair();
    let mut guest = game(transport, Role::Guest);
    peer.send_message(&Message::JoinError {
        message: "Room is full".to_string(),
    })
    .await?;

    let err = guest.join_room("QQQQ").await.unwrap_err();
    assert!(err.to_string().contains("Room is full"));
    assert_eq!(
        guest.session().phase(),
        &Phase::Closed(CloseReason::JoinRejected("Room is full".to_string()))
    );
    let mut rng = SmallRng::seed_from_u64(1);
    assert!(guest.run(&mut rng).await.is_err());
    Ok(())
}
