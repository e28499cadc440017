use tracing::debug;

use super::bytes::{ByteBuffer, ShortRead};
use super::error::{DecodeError, DecodeFailure};
use super::layout;
use super::types::{ChartFingerprint, InstrumentScore, ScoreHeader, SongScoreRecord};

/// Decode a complete `scoredata.bin` buffer.
///
/// Reads strictly forward. On failure the returned [`DecodeFailure`] holds the
/// error and every record that was fully parsed before it; a record that was
/// cut short is never included. Bytes after the declared number of records
/// are ignored.
pub fn decode(bytes: &[u8]) -> Result<Vec<SongScoreRecord>, DecodeFailure> {
    let mut decoder = Decoder::new(bytes);
    match decoder.run() {
        Ok(()) => Ok(decoder.records),
        Err(error) => Err(DecodeFailure {
            error,
            records: decoder.records,
        }),
    }
}

/// Decode only the 8-byte file header.
pub fn decode_header(bytes: &[u8]) -> Result<ScoreHeader, DecodeError> {
    Decoder::new(bytes).header()
}

struct Decoder<'a> {
    buf: ByteBuffer<'a>,
    records: Vec<SongScoreRecord>,
}

impl<'a> Decoder<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            buf: ByteBuffer::new(bytes),
            records: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<(), DecodeError> {
        let header = self.header()?;

        // The declared count is untrusted; never reserve more than the
        // remaining bytes could possibly hold.
        let declared = usize::try_from(header.song_count).unwrap_or(usize::MAX);
        let capacity = declared.min(self.buf.remaining() / layout::song::SIZE);
        self.records.reserve(capacity);

        for _ in 0..header.song_count {
            let record = self.record()?;
            self.records.push(record);
        }

        if self.buf.remaining() > 0 {
            debug!(
                "Ignoring {} trailing bytes after {} song records",
                self.buf.remaining(),
                self.records.len()
            );
        }
        debug!("Decoded {} song records", self.records.len());
        Ok(())
    }

    fn header(&mut self) -> Result<ScoreHeader, DecodeError> {
        if self.buf.len() < layout::header::SIZE {
            return Err(DecodeError::HeaderTooShort {
                len: self.buf.len(),
            });
        }

        let magic = self.field("magic", ByteBuffer::read_array::<{ layout::header::MAGIC }>)?;
        let song_count = self.field("song_count", ByteBuffer::read_u32)?;
        Ok(ScoreHeader { magic, song_count })
    }

    fn record(&mut self) -> Result<SongScoreRecord, DecodeError> {
        let fingerprint = self.field(
            "chart_fingerprint",
            ByteBuffer::read_array::<{ ChartFingerprint::LEN }>,
        )?;
        let instrument_count = self.field("instrument_count", ByteBuffer::read_u8)?;
        let aggregate_play_count = self.field("aggregate_play_count", ByteBuffer::read_u24)?;

        let mut instruments = Vec::with_capacity(usize::from(instrument_count));
        for _ in 0..instrument_count {
            instruments.push(self.instrument()?);
        }

        Ok(SongScoreRecord {
            chart_fingerprint: ChartFingerprint::new(fingerprint),
            aggregate_play_count,
            instruments,
        })
    }

    fn instrument(&mut self) -> Result<InstrumentScore, DecodeError> {
        Ok(InstrumentScore {
            instrument_id: self.field("instrument_id", ByteBuffer::read_u16)?,
            difficulty: self.field("difficulty", ByteBuffer::read_u8)?,
            notes_hit: self.field("notes_hit", ByteBuffer::read_u16)?,
            notes_total: self.field("notes_total", ByteBuffer::read_u16)?,
            stars: self.field("stars", ByteBuffer::read_u8)?,
            reserved: self.field(
                "reserved",
                ByteBuffer::read_array::<{ layout::instrument::RESERVED }>,
            )?,
            score: self.field("score", ByteBuffer::read_u32)?,
        })
    }

    /// Run one cursor read, attributing a short read to `field`.
    fn field<T>(
        &mut self,
        field: &'static str,
        read: impl FnOnce(&mut ByteBuffer<'a>) -> Result<T, ShortRead>,
    ) -> Result<T, DecodeError> {
        read(&mut self.buf).map_err(|short| DecodeError::TruncatedInput {
            offset: short.offset,
            field,
            needed: short.needed,
            remaining: short.remaining,
            records_parsed: self.records.len(),
        })
    }
}
