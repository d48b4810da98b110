mod fixtures;

use std::{net::SocketAddr, time::Duration};

use solotray::{utils::mock::GatedPresenter, IconKind, Indicator, ModeRequest, RelayClient};
use tokio::{io::AsyncWriteExt, net::TcpStream, time};

use crate::fixtures::{wait_for_mode, LeaderFixture};

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[test_log::test(tokio::test)]
async fn test_leader_ignores_malformed_messages() -> anyhow::Result<()> {
    let mut leader = LeaderFixture::start(ModeRequest::Normal).await?;
    leader.next_indicator(Duration::from_secs(1)).await.unwrap();
    let addr = leader.get_config().address;

    for payload in [&b"FLAG:"[..], b"FLAG:1234:GARBAGE", b"FLAG:1234", b"NOPE:1:TEST"] {
        send_raw(addr, payload).await?;
    }

    // Nothing presented and nothing changed.
    assert!(leader
        .next_indicator(Duration::from_millis(200))
        .await
        .is_none());
    assert_eq!(
        leader.get_mode_handle().current_mode().await?,
        ModeRequest::Normal
    );

    // Still serving.
    send_raw(addr, b"FLAG:1234:TEST").await?;
    assert!(
        wait_for_mode(
            leader.get_mode_handle(),
            ModeRequest::Test,
            Duration::from_secs(1)
        )
        .await?
    );

    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_leader_survives_follower_that_disconnects_early() -> anyhow::Result<()> {
    let leader = LeaderFixture::start(ModeRequest::Normal).await?;
    let addr = leader.get_config().address;

    drop(TcpStream::connect(addr).await?);
    let _silent = TcpStream::connect(addr).await?;

    RelayClient::default().send(addr, ModeRequest::Test).await?;
    assert!(
        wait_for_mode(
            leader.get_mode_handle(),
            ModeRequest::Test,
            Duration::from_secs(1)
        )
        .await?
    );

    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_burst_while_consumer_is_busy_drops_requests() -> anyhow::Result<()> {
    let (presenter, gate, indicators_rx) = GatedPresenter::new();
    let mut leader =
        LeaderFixture::start_with(ModeRequest::Normal, presenter, indicators_rx).await?;
    let addr = leader.get_config().address;

    // The consumer is stuck presenting the initial mode, so the slot fills and stays full.
    let sent = [ModeRequest::Test, ModeRequest::Normal, ModeRequest::Test];
    let client = RelayClient::default();
    for mode in sent {
        client.send(addr, mode).await?;
    }
    time::sleep(Duration::from_millis(300)).await;

    gate.add_permits(sent.len() + 1);

    let initial = leader.next_indicator(Duration::from_secs(1)).await.unwrap();
    assert_eq!(initial.icon, IconKind::Normal);

    let mut presented = vec![];
    while let Some(indicator) = leader.next_indicator(Duration::from_millis(300)).await {
        presented.push(mode_of(&indicator));
    }

    assert!(!presented.is_empty());
    assert!(presented.len() < sent.len()); // At least one request was dropped.
    assert!(is_subsequence(&presented, &sent));
    assert_eq!(
        leader.get_mode_handle().current_mode().await?,
        *presented.last().unwrap()
    );

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

async fn send_raw(addr: SocketAddr, payload: &[u8]) -> anyhow::Result<()> {
    let mut stream = TcpStream::connect(addr).await?;
    stream.write_all(payload).await?;
    stream.shutdown().await?;
    Ok(())
}

fn mode_of(indicator: &Indicator) -> ModeRequest {
    match indicator.icon {
        IconKind::Normal => ModeRequest::Normal,
        IconKind::Test => ModeRequest::Test,
    }
}

fn is_subsequence(items: &[ModeRequest], of: &[ModeRequest]) -> bool {
    let mut of = of.iter();
    items.iter().all(|item| of.any(|candidate| candidate == item))
}
