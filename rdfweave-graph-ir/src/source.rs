//! Sources and the stream processor
//!
//! A `Source` reads a byte stream and drives its sink. `StreamProcessor`
//! owns the lifecycle around it: `start_stream` before the source runs and
//! `end_stream` afterwards, even when the source fails.

use crate::error::{GraphError, Result};
use crate::sink::{CharSink, Sink};
use std::io::Read;
use tracing::{debug, trace};

/// Producer of sink events from a byte stream
pub trait Source {
    type Error: From<GraphError>;

    /// The sink this source feeds
    fn sink(&mut self) -> &mut dyn Sink;

    /// Read `input` to the end, emitting events to the sink
    fn drive(&mut self, input: &mut dyn Read) -> std::result::Result<(), Self::Error>;
}

/// Runs a [`Source`] with the stream lifecycle around it
#[derive(Debug)]
pub struct StreamProcessor<S> {
    source: S,
}

impl<S: Source> StreamProcessor<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Process one input stream
    ///
    /// `end_stream` is always called once `start_stream` succeeded. A source
    /// error takes precedence over an `end_stream` error.
    pub fn process<R: Read>(&mut self, mut input: R) -> std::result::Result<(), S::Error> {
        self.source.sink().start_stream()?;
        trace!("stream started");
        let outcome = self.source.drive(&mut input);
        let ended = self.source.sink().end_stream();
        outcome?;
        ended?;
        trace!("stream ended");
        Ok(())
    }
}

/// Read a whole stream as text
///
/// A UTF-8 byte-order mark is stripped; input starting with a UTF-16 BOM
/// (either byte order) is decoded as UTF-16. Anything else must be UTF-8.
pub fn read_text(input: &mut dyn Read) -> Result<String> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    decode_text(bytes)
}

/// Decode bytes with the same rules as [`read_text`]
pub fn decode_text(bytes: Vec<u8>) -> Result<String> {
    match bytes.as_slice() {
        [0xEF, 0xBB, 0xBF, rest @ ..] => {
            debug!("stripped UTF-8 byte-order mark");
            utf8(rest.to_vec())
        }
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        _ => utf8(bytes),
    }
}

fn utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| GraphError::Encoding {
        encoding: "UTF-8",
        message: e.to_string(),
    })
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    debug!("decoding UTF-16 input");
    if bytes.len() % 2 != 0 {
        return Err(GraphError::Encoding {
            encoding: "UTF-16",
            message: "odd number of bytes".to_string(),
        });
    }
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| GraphError::Encoding {
            encoding: "UTF-16",
            message: e.to_string(),
        })
}

const CHUNK_CHARS: usize = 4096;

/// Source that decodes its input and hands it to a [`CharSink`] in chunks
#[derive(Debug)]
pub struct CharSource<S> {
    sink: S,
}

impl<S: CharSink> CharSource<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: CharSink> Source for CharSource<S> {
    type Error = GraphError;

    fn sink(&mut self) -> &mut dyn Sink {
        &mut self.sink
    }

    fn drive(&mut self, input: &mut dyn Read) -> Result<()> {
        let text = read_text(input)?;
        let mut rest = text.as_str();
        while !rest.is_empty() {
            let end = rest
                .char_indices()
                .nth(CHUNK_CHARS)
                .map(|(idx, _)| idx)
                .unwrap_or(rest.len());
            let (chunk, tail) = rest.split_at(end);
            self.sink.characters(chunk)?;
            rest = tail;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::CharBufferSink;

    /// Sink recording the lifecycle calls it receives
    #[derive(Default)]
    struct Lifecycle {
        calls: Vec<&'static str>,
    }

    impl Sink for Lifecycle {
        fn start_stream(&mut self) -> Result<()> {
            self.calls.push("start");
            Ok(())
        }

        fn end_stream(&mut self) -> Result<()> {
            self.calls.push("end");
            Ok(())
        }
    }

    struct FailingSource {
        sink: Lifecycle,
    }

    impl Source for FailingSource {
        type Error = GraphError;

        fn sink(&mut self) -> &mut dyn Sink {
            &mut self.sink
        }

        fn drive(&mut self, _input: &mut dyn Read) -> Result<()> {
            Err(GraphError::sink("boom"))
        }
    }

    #[test]
    fn test_end_stream_runs_after_failure() {
        let mut processor = StreamProcessor::new(FailingSource {
            sink: Lifecycle::default(),
        });
        let err = processor.process(&b"anything"[..]).unwrap_err();
        assert!(matches!(err, GraphError::Sink(_)));
        assert_eq!(processor.into_source().sink.calls, vec!["start", "end"]);
    }

    #[test]
    fn test_char_source_strips_bom() {
        let mut processor = StreamProcessor::new(CharSource::new(CharBufferSink::new()));
        processor.process(&b"\xEF\xBB\xBFhello"[..]).unwrap();
        assert_eq!(processor.into_source().into_sink().as_str(), "hello");
    }

    #[test]
    fn test_decode_utf16() {
        let le = vec![0xFF, 0xFE, b'h', 0, b'i', 0];
        assert_eq!(decode_text(le).unwrap(), "hi");
        let be = vec![0xFE, 0xFF, 0, b'o', 0, b'k'];
        assert_eq!(decode_text(be).unwrap(), "ok");
        assert!(decode_text(vec![0xFF, 0xFE, 0x00]).is_err());
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        assert!(matches!(
            decode_text(vec![0xC3, 0x28]),
            Err(GraphError::Encoding { encoding: "UTF-8", .. })
        ));
    }

    #[test]
    fn test_char_source_chunks_large_input() {
        let text = "x".repeat(CHUNK_CHARS * 2 + 3);
        let mut processor = StreamProcessor::new(CharSource::new(CharBufferSink::new()));
        processor.process(text.as_bytes()).unwrap();
        let sink = processor.into_source().into_sink();
        assert_eq!(sink.chunks(), 3);
        assert_eq!(sink.as_str().len(), text.len());
    }
}
