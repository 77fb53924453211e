/// Errors that can occur on the link to the robot.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// The link was closed, locally or by the peer.
    #[error("link closed: {0}")]
    Closed(String),

    /// Writing to the link failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Reading from the link failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            LinkError::Closed("peer hung up".into()).to_string(),
            "link closed: peer hung up"
        );
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        assert_eq!(LinkError::SendFailed(io).to_string(), "send failed: pipe");
    }

    #[test]
    fn test_io_errors_are_kept_as_source() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err = LinkError::ReceiveFailed(io);
        assert!(std::error::Error::source(&err).is_some());
    }
}
