use camino::Utf8Path as Path;
use eyre::Result;
use lofty::prelude::*;
use lofty::probe::Probe;
use tracing::debug;

/// Duration of the media file at `path` in whole seconds.
///
/// Anything that can't be parsed (not a media file, unsupported container,
/// unreadable) counts as 0.
pub fn parse_duration(path: &Path) -> u64 {
    match read_duration(path) {
        Ok(secs) => secs,
        Err(err) => {
            debug!(%path, "could not read duration: {}", err);
            0
        }
    }
}

fn read_duration(path: &Path) -> Result<u64> {
    let tagged_file = Probe::open(path)?.guess_file_type()?.read()?;
    Ok(tagged_file.properties().duration().as_secs())
}

/// A mono 16 bit PCM WAV file of the given length
#[cfg(test)]
pub(crate) fn test_wav(seconds: u32) -> Vec<u8> {
    let sample_rate: u32 = 8000;
    let block_align: u16 = 2;
    let data_len = sample_rate * u32::from(block_align) * seconds;
    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // channels
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&(sample_rate * u32::from(block_align)).to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.resize(44 + data_len as usize, 0);
    wav
}

#[cfg(test)]
mod test {
    use camino::Utf8PathBuf as PathBuf;

    use super::*;

    fn write_temp(name: &str, bytes: &[u8]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = PathBuf::from_path_buf(dir.path().join(name)).unwrap();
        std::fs::write(&path, bytes).unwrap();
        (dir, path)
    }

    #[test]
    fn wav_duration() {
        let (_dir, path) = write_temp("tone.wav", &test_wav(3));
        assert_eq!(parse_duration(&path), 3);
    }

    #[test]
    fn garbage_is_zero() {
        let (_dir, path) = write_temp("garbage.mp3", b"\x00\x01definitely not audio");
        assert_eq!(parse_duration(&path), 0);
        let (_dir, path) = write_temp("empty", b"");
        assert_eq!(parse_duration(&path), 0);
    }

    #[test]
    fn missing_file_is_zero() {
        assert_eq!(parse_duration(Path::new("/nonexistent/file.mp3")), 0);
    }
}
