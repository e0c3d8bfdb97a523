//! A minimal async IMAP client supporting only the commands this
//! program needs: LOGIN / AUTHENTICATE XOAUTH2, SELECT, SEARCH, FETCH,
//! APPEND, LOGOUT.
//!
//! Raw TCP + TLS (rustls); one connection, strictly sequential commands.

use std::sync::Arc;

use base64::Engine;
use tracing::debug;

/// Async read+write stream marker.
trait ImapStream: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send {}
impl<T: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send> ImapStream for T {}

pub struct ImapClient {
    reader: tokio::io::BufReader<tokio::io::ReadHalf<Box<dyn ImapStream>>>,
    writer: tokio::io::WriteHalf<Box<dyn ImapStream>>,
    tag_counter: u32,
}

impl ImapClient {
    /// Connect to an IMAP server (plain or IMAPS/TLS).
    pub async fn connect(host: &str, port: u16, use_ssl: bool) -> anyhow::Result<Self> {
        use tokio::io::BufReader;
        use tokio::net::TcpStream;

        let tcp = TcpStream::connect((host, port)).await?;

        let stream: Box<dyn ImapStream> = if use_ssl {
            let mut root_store = rustls::RootCertStore::empty();
            root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

            let config = rustls::ClientConfig::builder()
                .with_root_certificates(root_store)
                .with_no_client_auth();

            let connector = tokio_rustls::TlsConnector::from(Arc::new(config));
            let server_name = rustls::pki_types::ServerName::try_from(host.to_string())
                .map_err(|e| anyhow::anyhow!("invalid server name '{}': {}", host, e))?;
            let tls = connector.connect(server_name, tcp).await?;
            Box::new(tls)
        } else {
            Box::new(tcp)
        };

        let (read, write) = tokio::io::split(stream);
        let mut client = Self {
            reader: BufReader::new(read),
            writer: write,
            tag_counter: 0,
        };

        // Read server greeting (e.g. "* OK IMAP server ready")
        let greeting = client.read_line().await?;
        if !greeting.to_uppercase().starts_with("* OK") {
            anyhow::bail!("unexpected IMAP greeting: {}", greeting);
        }
        debug!(greeting = %greeting, "IMAP connected");

        Ok(client)
    }

    /// Read a single CRLF-terminated line.
    async fn read_line(&mut self) -> anyhow::Result<String> {
        use tokio::io::AsyncBufReadExt;
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await?;
        if n == 0 {
            anyhow::bail!("IMAP connection closed unexpectedly");
        }
        Ok(line
            .trim_end_matches("\r\n")
            .trim_end_matches('\n')
            .to_string())
    }

    /// Read exactly `n` bytes (an IMAP literal).
    async fn read_exact(&mut self, n: usize) -> anyhow::Result<Vec<u8>> {
        use tokio::io::AsyncReadExt;
        let mut buf = vec![0u8; n];
        self.reader.read_exact(&mut buf).await?;
        Ok(buf)
    }

    /// Send a tagged IMAP command. Returns the tag.
    async fn send_command(&mut self, cmd: &str) -> anyhow::Result<String> {
        use tokio::io::AsyncWriteExt;
        self.tag_counter += 1;
        let tag = format!("A{:04}", self.tag_counter);
        let line = format!("{} {}\r\n", tag, cmd);
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(tag)
    }

    /// Read responses until the tagged completion line.
    /// Returns (untagged_lines, tagged_status_line).
    async fn read_response(&mut self, tag: &str) -> anyhow::Result<(Vec<String>, String)> {
        let mut untagged = Vec::new();
        loop {
            let line = self.read_line().await?;
            if line.starts_with(tag) {
                return Ok((untagged, line));
            }
            untagged.push(line);
        }
    }

    /// Quote a string for use in an IMAP command.
    fn quote(s: &str) -> String {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    }

    /// LOGIN with username and password.
    pub async fn login(&mut self, user: &str, pass: &str) -> anyhow::Result<()> {
        let cmd = format!("LOGIN {} {}", Self::quote(user), Self::quote(pass));
        let tag = self.send_command(&cmd).await?;
        let (_, status) = self.read_response(&tag).await?;
        if !status.to_uppercase().contains("OK") {
            anyhow::bail!("IMAP LOGIN failed: {}", status);
        }
        Ok(())
    }

    /// AUTHENTICATE XOAUTH2 with a pre-acquired access token.
    ///
    /// On a challenge ("+ <base64-json-error>") the client replies with an
    /// empty line to collect the tagged NO, per the SASL exchange.
    pub async fn authenticate_xoauth2(&mut self, user: &str, token: &str) -> anyhow::Result<()> {
        use tokio::io::AsyncWriteExt;

        let sasl = format!("user={}\x01auth=Bearer {}\x01\x01", user, token);
        let encoded = base64::engine::general_purpose::STANDARD.encode(sasl.as_bytes());
        let tag = self
            .send_command(&format!("AUTHENTICATE XOAUTH2 {}", encoded))
            .await?;

        loop {
            let line = self.read_line().await?;
            if line.starts_with('+') {
                // Server sent an error challenge; acknowledge it.
                self.writer.write_all(b"\r\n").await?;
                self.writer.flush().await?;
                continue;
            }
            if line.starts_with(&tag) {
                if !line.to_uppercase().contains("OK") {
                    anyhow::bail!("IMAP XOAUTH2 auth failed: {}", line);
                }
                return Ok(());
            }
        }
    }

    /// SELECT a mailbox.
    pub async fn select(&mut self, mailbox: &str) -> anyhow::Result<()> {
        let cmd = format!("SELECT {}", Self::quote(mailbox));
        let tag = self.send_command(&cmd).await?;
        let (_, status) = self.read_response(&tag).await?;
        if !status.to_uppercase().contains("OK") {
            anyhow::bail!("IMAP SELECT failed: {}", status);
        }
        Ok(())
    }

    /// SEARCH with arbitrary criteria (e.g. `UNSEEN`, `FROM "a@b"`).
    /// Returns message sequence numbers in mailbox order (oldest first).
    pub async fn search(&mut self, criteria: &str) -> anyhow::Result<Vec<u32>> {
        let tag = self.send_command(&format!("SEARCH {}", criteria)).await?;
        let (lines, status) = self.read_response(&tag).await?;
        if !status.to_uppercase().contains("OK") {
            anyhow::bail!("IMAP SEARCH failed: {}", status);
        }

        let mut seqnums = Vec::new();
        for line in &lines {
            if line.to_uppercase().starts_with("* SEARCH") {
                let nums: Vec<u32> = line
                    .split_whitespace()
                    .skip(2) // skip "* SEARCH"
                    .filter_map(|s| s.parse().ok())
                    .collect();
                seqnums.extend(nums);
            }
        }
        seqnums.sort_unstable();
        Ok(seqnums)
    }

    /// FETCH the full raw message (RFC 2822 bytes) for one sequence number.
    /// Uses BODY.PEEK[] so the message keeps its unread flag.
    pub async fn fetch_body(&mut self, seqnum: u32) -> anyhow::Result<Vec<u8>> {
        let tag = self
            .send_command(&format!("FETCH {} (BODY.PEEK[])", seqnum))
            .await?;

        let mut raw = Vec::new();
        loop {
            let line = self.read_line().await?;

            // Tagged response = done
            if line.starts_with(&tag) {
                if !line.to_uppercase().contains("OK") {
                    anyhow::bail!("IMAP FETCH failed: {}", line);
                }
                break;
            }

            // Untagged FETCH response: * N FETCH (BODY[] {size}
            if line.starts_with("* ") && line.to_uppercase().contains("FETCH") {
                if let Some(size) = parse_literal_size(&line) {
                    raw = self.read_exact(size).await?;
                    // Read the closing line after the literal data.
                    let _closing = self.read_line().await?;
                }
            }
        }

        if raw.is_empty() {
            anyhow::bail!("IMAP FETCH returned no body for seqnum {}", seqnum);
        }
        Ok(raw)
    }

    /// APPEND a message to a folder with the given flags.
    ///
    /// Waits for the server's continuation response before sending the
    /// message literal.
    pub async fn append(
        &mut self,
        folder: &str,
        flags: &str,
        message: &[u8],
    ) -> anyhow::Result<()> {
        use tokio::io::AsyncWriteExt;

        let cmd = format!(
            "APPEND {} ({}) {{{}}}",
            Self::quote(folder),
            flags,
            message.len()
        );
        let tag = self.send_command(&cmd).await?;

        // Wait for the "+" continuation (untagged lines may precede it).
        loop {
            let line = self.read_line().await?;
            if line.starts_with('+') {
                break;
            }
            if line.starts_with(&tag) {
                anyhow::bail!("IMAP APPEND rejected: {}", line);
            }
        }

        self.writer.write_all(message).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;

        let (_, status) = self.read_response(&tag).await?;
        if !status.to_uppercase().contains("OK") {
            anyhow::bail!("IMAP APPEND failed: {}", status);
        }
        Ok(())
    }

    /// LOGOUT.
    pub async fn logout(&mut self) -> anyhow::Result<()> {
        let tag = self.send_command("LOGOUT").await?;
        // Server may send * BYE before the tagged OK
        let _ = self.read_response(&tag).await;
        Ok(())
    }
}

/// Extract the size of an IMAP literal (`{N}` at end of line).
fn parse_literal_size(line: &str) -> Option<usize> {
    let start = line.rfind('{')?;
    let end = line.rfind('}')?;
    if end > start {
        line[start + 1..end].parse().ok()
    } else {
        None
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
