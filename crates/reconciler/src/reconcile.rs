/// 配置行调和
///
/// 保证配置文件中某个 key 恰好存在一行生效的 `key=value`。
/// 处理优先级：
/// 1. 存在被注释的 `# key=` 行：取消注释并写入期望值
/// 2. 存在生效的 `key=` 行：值不同才改写，相同则不动
/// 3. 都不存在：在文件末尾追加

use common::{Error, Result};
use regex::Regex;

/// 配置项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// 生效行文本
    pub fn line(&self) -> String {
        format!("{}={}", self.key, self.value)
    }
}

/// 单个配置项的调和结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 注释行被取消注释并设置为期望值
    Uncommented,
    /// 生效行的值被改写
    Updated,
    /// 已是期望值
    Unchanged,
    /// 追加到文件末尾
    Appended,
}

impl Outcome {
    pub fn is_change(self) -> bool {
        self != Outcome::Unchanged
    }
}

/// 调和后的文件内容
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub content: String,
    pub outcome: Outcome,
}

/// 某个 key 的行匹配器
struct KeyMatcher {
    commented: Regex,
    active: Regex,
}

impl KeyMatcher {
    fn new(key: &str) -> Result<Self> {
        if key.is_empty() || key.contains('=') || key.contains('\n') {
            return Err(Error::InvalidArgument(format!("非法的配置项名称: {:?}", key)));
        }

        let escaped = regex::escape(key);
        let commented = Regex::new(&format!(r"^#\s*{}=", escaped))
            .map_err(|e| Error::InvalidArgument(format!("无法构造匹配规则: {}", e)))?;
        let active = Regex::new(&format!(r"^{}=", escaped))
            .map_err(|e| Error::InvalidArgument(format!("无法构造匹配规则: {}", e)))?;

        Ok(Self { commented, active })
    }
}

/// 调和单个配置项
pub fn reconcile(content: &str, entry: &ConfigEntry) -> Result<Reconciled> {
    let matcher = KeyMatcher::new(&entry.key)?;
    let lines: Vec<&str> = content.lines().collect();
    let desired = entry.line();
    let eol = line_ending(content);

    // 1. 注释行优先
    if lines.iter().any(|line| matcher.commented.is_match(line)) {
        let content = collapse(&lines, &desired, eol, content.ends_with('\n'), |line| {
            matcher.commented.is_match(line) || matcher.active.is_match(line)
        });
        return Ok(Reconciled {
            content,
            outcome: Outcome::Uncommented,
        });
    }

    // 2. 已有生效行
    let active: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| matcher.active.is_match(line))
        .collect();

    if let Some(first) = active.first() {
        let current = &first[entry.key.len() + 1..];
        if current.trim() == entry.value.trim() && active.len() == 1 {
            return Ok(Reconciled {
                content: content.to_string(),
                outcome: Outcome::Unchanged,
            });
        }

        let content = collapse(&lines, &desired, eol, content.ends_with('\n'), |line| {
            matcher.active.is_match(line)
        });
        return Ok(Reconciled {
            content,
            outcome: Outcome::Updated,
        });
    }

    // 3. 追加
    let mut appended = content.to_string();
    if !appended.is_empty() && !appended.ends_with('\n') {
        appended.push_str(eol);
    }
    appended.push_str(&desired);
    appended.push_str(eol);

    Ok(Reconciled {
        content: appended,
        outcome: Outcome::Appended,
    })
}

/// 沿用文件原有的换行符
fn line_ending(content: &str) -> &'static str {
    if content.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// 第一条匹配行替换为期望行，其余匹配行删除
fn collapse<F>(lines: &[&str], desired: &str, eol: &str, trailing_newline: bool, matches: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut written = false;
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());

    for &line in lines {
        if matches(line) {
            if !written {
                out.push(desired);
                written = true;
            }
        } else {
            out.push(line);
        }
    }

    let mut content = out.join(eol);
    if trailing_newline {
        content.push_str(eol);
    }
    content
}
