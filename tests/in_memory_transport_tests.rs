use battleship::transport::{InMemoryTransport, Transport};
use battleship::{Envelope, Message, MessageType};

#[tokio::test(flavor = "multi_thread")]
async fn test_in_memory_pair_preserves_order() -> anyhow::Result<()> {
    let (mut a, mut b) = InMemoryTransport::pair();

    a.send_message(&Message::ShipsPlaced).await?;
    a.send_message(&Message::Attack { row: 2, col: 8 }).await?;
    b.send(Envelope::empty(MessageType::OpponentLeft)).await?;

    assert_eq!(Message::from_envelope(&b.recv().await?)?, Message::ShipsPlaced);
    assert_eq!(
        Message::from_envelope(&b.recv().await?)?,
        Message::Attack { row: 2, col: 8 }
    );
    assert_eq!(a.recv().await?.message_type(), Some(MessageType::OpponentLeft));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_recv_waits_for_sender() -> anyhow::Result<()> {
    let (mut a, mut b) = InMemoryTransport::pair();
    let reader = tokio::spawn(async move { b.recv().await });
    tokio::task::yield_now().await;
    a.send_message(&Message::GameStart).await?;
    let env = reader.await??;
    assert_eq!(env.message_type(), Some(MessageType::GameStart));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dropped_peer_is_reported() -> anyhow::Result<()> {
    let (mut a, b) = InMemoryTransport::pair();
    let (mut c, mut d) = InMemoryTransport::pair();

    c.send_message(&Message::ShipsPlaced).await?;
    drop(c);
    // queued messages are still delivered before the error
    assert!(d.recv().await.is_ok());
    assert!(d.recv().await.is_err());

    drop(b);
    assert!(a.send_message(&Message::ShipsPlaced).await.is_err());
    assert!(a.recv().await.is_err());
    Ok(())
}
