/// 交互式输入

use common::{Error, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R, W> Prompter<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// 询问一个值；直接回车使用默认值，没有默认值时重新询问
    pub async fn ask(&mut self, label: &str, default: Option<&str>) -> Result<String> {
        loop {
            let prompt = match default {
                Some(d) => format!("{} [{}]: ", label, d),
                None => format!("{}: ", label),
            };
            self.output.write_all(prompt.as_bytes()).await?;
            self.output.flush().await?;

            let mut line = String::new();
            if self.input.read_line(&mut line).await? == 0 {
                return Err(Error::InvalidArgument(format!("输入已结束，未获得 {}", label)));
            }

            let answer = line.trim();
            if !answer.is_empty() {
                return Ok(answer.to_string());
            }
            if let Some(d) = default {
                return Ok(d.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ask_reads_trimmed_answer() {
        let input: &[u8] = b"  10.0.0.1 \n";
        let mut output = Vec::new();
        let mut prompter = Prompter::new(input, &mut output);

        let value = prompter.ask("Zabbix Server", None).await.unwrap();
        assert_eq!(value, "10.0.0.1");
        assert_eq!(String::from_utf8(output).unwrap(), "Zabbix Server: ");
    }

    #[tokio::test]
    async fn test_empty_answer_uses_default() {
        let input: &[u8] = b"\n";
        let mut output = Vec::new();
        let mut prompter = Prompter::new(input, &mut output);

        let value = prompter.ask("Hostname", Some("web01")).await.unwrap();
        assert_eq!(value, "web01");
    }

    #[tokio::test]
    async fn test_empty_answer_without_default_asks_again() {
        let input: &[u8] = b"\n\nzbx.example.com\n";
        let mut output = Vec::new();
        let mut prompter = Prompter::new(input, &mut output);

        let value = prompter.ask("ServerActive", None).await.unwrap();
        assert_eq!(value, "zbx.example.com");
        assert_eq!(String::from_utf8(output).unwrap().matches("ServerActive: ").count(), 3);
    }

    #[tokio::test]
    async fn test_eof_is_error() {
        let input: &[u8] = b"";
        let mut prompter = Prompter::new(input, tokio::io::sink());

        assert!(prompter.ask("Server", None).await.is_err());
    }
}
