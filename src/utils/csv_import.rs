//! 人员名单 CSV 解析
//!
//! 每行 `code,name,department`，多余列忽略；第一行非空行若为表头 (`code`) 则跳过。
//! 字段可用双引号包裹（内含逗号），`""` 表示一个引号。

/// 解析出的单行人员数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRow {
    /// 已去空格并转为大写
    pub code: String,
    pub name: String,
    pub department: Option<String>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedRoster {
    pub rows: Vec<ParticipantRow>,
    /// 缺少编号或姓名、或引号未闭合的行
    pub invalid: u64,
}

pub fn parse_participant_csv(content: &str) -> ParsedRoster {
    let mut roster = ParsedRoster::default();
    let content = content.trim_start_matches('\u{feff}');
    let mut first_line = true;

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let is_first = std::mem::replace(&mut first_line, false);

        let Some(fields) = split_fields(line) else {
            roster.invalid += 1;
            continue;
        };
        let mut parts = fields.iter().map(|f| f.trim());
        let code = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();
        let department = parts.next().unwrap_or_default();

        if is_first && code.eq_ignore_ascii_case("code") {
            continue;
        }

        if code.is_empty() || name.is_empty() {
            roster.invalid += 1;
            continue;
        }

        roster.rows.push(ParticipantRow {
            code: code.to_uppercase(),
            name: name.to_string(),
            department: (!department.is_empty()).then(|| department.to_string()),
        });
    }

    roster
}

/// 按逗号切分一行，支持双引号包裹的字段；引号未闭合时返回 None
fn split_fields(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return None;
    }
    fields.push(field);
    Some(fields)
}
