//! Model name query
//!
//! `GET /model` answers `{"model": "<name>"}`. The name is shown on the
//! welcome screen; failures are shown as short markers instead.

use askterm_protocol::{parse_status, ModelDescriptor, Request, MAX_MODEL_LEN, STATUS_OK};
use embedded_io_async::Write;
use heapless::String;

use crate::config::ServerEndpoint;
use crate::stream::FrameReader;
use crate::traits::Connector;

/// Room for a `GET /model` request
const MODEL_REQUEST_LEN: usize = 128;

/// What the server reported as its model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModelName {
    /// Not queried yet
    #[default]
    Unknown,
    Known(String<MAX_MODEL_LEN>),
    /// No connection, or a status other than 200
    NoResponse,
    /// The body was not `{"model": ...}`
    ParseError,
}

impl ModelName {
    pub fn as_str(&self) -> &str {
        match self {
            ModelName::Unknown => "unknown",
            ModelName::Known(name) => name,
            ModelName::NoResponse => "no_resp",
            ModelName::ParseError => "parse_err",
        }
    }
}

/// Ask the server which model it runs
pub async fn fetch_model<C: Connector>(connector: &mut C, endpoint: &ServerEndpoint) -> ModelName {
    let mut request = [0u8; MODEL_REQUEST_LEN];
    let len = match Request::model(&endpoint.host, endpoint.port).encode(&mut request) {
        Ok(len) => len,
        Err(_) => return ModelName::NoResponse,
    };

    let mut connection = match connector.connect(endpoint).await {
        Ok(connection) => connection,
        Err(_) => return ModelName::NoResponse,
    };
    if connection.write_all(&request[..len]).await.is_err()
        || connection.flush().await.is_err()
    {
        return ModelName::NoResponse;
    }

    let mut reader = FrameReader::new(&mut connection);

    let status = match reader.next_frame().await {
        Some(line) => parse_status(line.as_bytes()),
        None => None,
    };
    if status != Some(STATUS_OK) {
        return ModelName::NoResponse;
    }

    loop {
        match reader.next_frame().await {
            Some(line) if line.is_head_terminator() => break,
            Some(_) => continue,
            None => return ModelName::ParseError,
        }
    }

    while let Some(line) = reader.next_frame().await {
        let body = line.trimmed();
        if body.is_empty() {
            continue;
        }
        return match ModelDescriptor::decode_model(body) {
            Ok(name) => ModelName::Known(name),
            Err(_) => ModelName::ParseError,
        };
    }
    ModelName::ParseError
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeConnector, Script};
    use embassy_futures::block_on;

    fn query(script: Script) -> (ModelName, FakeConnector) {
        let mut connector = FakeConnector::default();
        connector.scripts.push_back(script);
        let name = block_on(fetch_model(&mut connector, &ServerEndpoint::default()));
        (name, connector)
    }

    #[test]
    fn test_known_model() {
        let (name, connector) = query(Script::Respond(
            b"HTTP/1.1 200 OK\r\nContent-Length: 19\r\n\r\n{\"model\":\"mistral\"}\n".to_vec(),
        ));
        assert_eq!(name.as_str(), "mistral");
        assert_eq!(
            connector.requests[0],
            b"GET /model HTTP/1.1\r\nHost: 192.168.0.118:5005\r\nConnection: close\r\n\r\n"
        );
    }

    #[test]
    fn test_non_200_is_no_resp() {
        let (name, _) = query(Script::Respond(
            b"HTTP/1.1 500 INTERNAL SERVER ERROR\r\n\r\n{\"error\":\"boom\"}".to_vec(),
        ));
        assert_eq!(name, ModelName::NoResponse);
        assert_eq!(name.as_str(), "no_resp");
    }

    #[test]
    fn test_refused_is_no_resp() {
        let (name, _) = query(Script::Refuse(crate::error::TransportError::Refused));
        assert_eq!(name, ModelName::NoResponse);
    }

    #[test]
    fn test_bad_body_is_parse_err() {
        let (name, _) = query(Script::Respond(
            b"HTTP/1.1 200 OK\r\n\r\n<html>nope</html>".to_vec(),
        ));
        assert_eq!(name, ModelName::ParseError);
        assert_eq!(name.as_str(), "parse_err");
    }

    #[test]
    fn test_missing_body_is_parse_err() {
        let (name, _) = query(Script::Respond(b"HTTP/1.1 200 OK\r\n\r\n".to_vec()));
        assert_eq!(name, ModelName::ParseError);
    }

    #[test]
    fn test_garbage_status_is_no_resp() {
        let (name, _) = query(Script::Respond(b"hello\n".to_vec()));
        assert_eq!(name, ModelName::NoResponse);
    }
}
