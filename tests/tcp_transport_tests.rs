use battleship_server::{InMemoryTransport, TcpTransport, Transport};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

#[tokio::test(flavor = "multi_thread")]
async fn lines_survive_split_writes_and_crlf() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let writer = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(b"HEL").await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        socket.write_all(b"LO Alice\r\nREADY\nATTACK 1 2").await.unwrap();
    });

    let mut t = TcpTransport::connect(addr).await?;
    assert_eq!(t.recv_line().await?.as_deref(), Some("HELLO Alice"));
    assert_eq!(t.recv_line().await?.as_deref(), Some("READY"));
    writer.await.unwrap();
    assert_eq!(t.recv_line().await?.as_deref(), Some("ATTACK 1 2"));
    assert_eq!(t.recv_line().await?, None);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn overlong_line_is_an_error() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let writer = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(&[b'A'; 64]).await.unwrap();
        socket
    });

    let stream = tokio::net::TcpStream::connect(addr).await?;
    let mut t = TcpTransport::with_max_line_len(stream, 16);
    let _socket = writer.await.unwrap();
    let err = t.recv_line().await.unwrap_err();
    assert!(err.to_string().contains("Line too long"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn overlong_terminated_line_is_an_error() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let writer = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut data = vec![b'A'; 400];
        data.push(b'\n');
        socket.write_all(&data).await.unwrap();
        socket
    });

    let stream = tokio::net::TcpStream::connect(addr).await?;
    let mut t = TcpTransport::with_max_line_len(stream, 16);
    let _socket = writer.await.unwrap();
    let err = t.recv_line().await.unwrap_err();
    assert!(err.to_string().contains("Line too long"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn line_at_the_limit_is_accepted() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let writer = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(b"ATTACK 1 2\nATTACK 3 4\n").await.unwrap();
    });

    let stream = tokio::net::TcpStream::connect(addr).await?;
    let mut t = TcpTransport::with_max_line_len(stream, 10);
    writer.await.unwrap();
    assert_eq!(t.recv_line().await?.as_deref(), Some("ATTACK 1 2"));
    assert_eq!(t.recv_line().await?.as_deref(), Some("ATTACK 3 4"));
    assert_eq!(t.recv_line().await?, None);
    Ok(())
}

#[tokio::test]
async fn in_memory_pair_is_bidirectional() -> anyhow::Result<()> {
    let (mut a, mut b) = InMemoryTransport::pair();
    a.send_line("HELLO Alice").await?;
    assert_eq!(b.recv_line().await?.as_deref(), Some("HELLO Alice"));
    b.send_line("WELCOME P1 Alice").await?;
    assert_eq!(a.recv_line().await?.as_deref(), Some("WELCOME P1 Alice"));
    drop(b);
    assert_eq!(a.recv_line().await?, None);
    assert!(a.send_line("READY").await.is_err());
    Ok(())
}
