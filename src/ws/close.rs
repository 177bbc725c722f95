use super::consts::*;

/// Close status codes registered by RFC 6455, section 7.4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseStatusCode {
    Normal,
    GoingAway,
    ProtocolError,
    UnsupportedData,
    Undefined,
    NoStatus,
    Abnormal,
    InvalidData,
    PolicyViolation,
    TooBig,
    MandatoryExtension,
    ServerError,
    TlsHandshakeFailure,
}
impl CloseStatusCode {
    pub fn decode(code: u16) -> Option<Self> {
        use CloseStatusCode::*;
        let status = match code {
            1000 => Normal,
            1001 => GoingAway,
            1002 => ProtocolError,
            1003 => UnsupportedData,
            CLOSE_UNDEFINED => Undefined,
            CLOSE_NO_STATUS => NoStatus,
            CLOSE_ABNORMAL => Abnormal,
            1007 => InvalidData,
            1008 => PolicyViolation,
            1009 => TooBig,
            1010 => MandatoryExtension,
            1011 => ServerError,
            CLOSE_TLS_HANDSHAKE => TlsHandshakeFailure,
            _ => return None,
        };
        Some(status)
    }
    pub fn encode(&self) -> u16 {
        use CloseStatusCode::*;
        match self {
            Normal => 1000,
            GoingAway => 1001,
            ProtocolError => 1002,
            UnsupportedData => 1003,
            Undefined => CLOSE_UNDEFINED,
            NoStatus => CLOSE_NO_STATUS,
            Abnormal => CLOSE_ABNORMAL,
            InvalidData => 1007,
            PolicyViolation => 1008,
            TooBig => 1009,
            MandatoryExtension => 1010,
            ServerError => 1011,
            TlsHandshakeFailure => CLOSE_TLS_HANDSHAKE,
        }
    }
    pub fn is_reserved(&self) -> bool {
        is_reserved(self.encode())
    }
}

/// Codes an endpoint must never put in a close frame it sends.
pub fn is_reserved(code: u16) -> bool {
    matches!(
        code,
        CLOSE_UNDEFINED | CLOSE_NO_STATUS | CLOSE_ABNORMAL | CLOSE_TLS_HANDSHAKE
    )
}
