//! Prompt templates for the chat-based capabilities

use carelog_domain::CareLog;
use serde_json::json;

/// Schema block shared by the risk and refinement prompts
const RISK_SCHEMA: &str = r#"{
  "riskLevel": "medium|high",
  "findings": [
    {
      "id": "string",
      "title": "string",
      "severity": "medium|high",
      "evidence": ["string", "..."],
      "recommendation": "string",
      "tasks": ["string", "..."],
      "goal": "string"
    }
  ],
  "notes": "string"
}"#;

const RISK_EXAMPLE: &str = r#"{
  "riskLevel": "high",
  "findings": [
    {
      "id": "fall_risk",
      "title": "転倒リスクの増加",
      "severity": "high",
      "evidence": ["夜間のトイレ立ち上がりでふらつきが見られた", "歩行時に手すりを頻繁に使用"],
      "recommendation": "夜間動線の安全確保と見守り強化",
      "tasks": ["ベッド脇に足元灯を設置", "トイレまでの通路に障害物がないか点検", "夜間の見守り頻度を増やす"],
      "goal": "夜間の立ち上がり・歩行時に転倒・転落が発生しない"
    }
  ],
  "notes": "昼間は安定しているが夜間の不安定さが目立つ"
}"#;

pub fn summary_system_prompt() -> String {
    [
        "あなたは日本語の要約アシスタントです。",
        "入力テキストから主観や感情を過度に追加せず、事実に基づいて要点を抽出します。",
        "1-2文で簡潔にまとめてください（おおよそ60-120文字、最大でも4行を目安）。",
        "出力は日本語の要約文のみを返してください。前置きや説明は不要です。",
        "重要: 入力者の観測・気づき・懸念などの要点を落とさず、過剰な装飾を避けること。",
    ]
    .join("\n")
}

pub fn risk_system_prompt() -> String {
    format!(
        "あなたは介護記録から認知症関連の危険兆候を抽出するアシスタントです。
必須要件:
- 有効なJSONのみを返す（説明・前置き・コードブロック禁止）
- ダブルクオートを用い、余計なキーを出さない、trailing comma禁止
- スキーマと値域に厳密に従う。日本語で簡潔に書く
- リスクが弱い/見当たらない場合も必ず有効なJSONを返す（findingsは空配列可）

スキーマ（順序は任意、型と値域は厳守）:
{RISK_SCHEMA}

制約:
- findings内の各要素には、入力ログ本文に基づく具体的な evidence を1〜5件含める
- tasksは最大3件まで。短い命令形で具体的に
- goalは1文で具体的に。結果が確認できる表現にする
- 入力に無い事実は書かない

評価観点（例）: 服薬忘れ/不遵守、転倒リスク（ふらつき・夜間トイレ頻回）、脱水/栄養低下、睡眠障害、見当識障害、感情の変化など。

良い出力例（内容は入力に応じて生成し、必ずJSONのみ）:
{RISK_EXAMPLE}

入力は JSON で careLogs の配列（主に {{id, content}}）。これらを解析して上記のJSONだけを返す。"
    )
}

pub fn refine_system_prompt() -> String {
    format!(
        "次の入力はモデル出力（誤って説明やコードフェンスを含む可能性あり）です。
要求: 下記スキーマに準拠した有効なJSONのみを返すこと。説明・コードブロック禁止。

スキーマ:
{RISK_SCHEMA}"
    )
}

/// User message for a risk request: `{"careLogs": [...]}`
pub fn risk_user_content(care_logs: &[CareLog]) -> String {
    json!({ "careLogs": care_logs }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_risk_user_content_shape() {
        let logs = vec![
            CareLog {
                id: Some(1),
                content: "夜間にふらつき".to_string(),
            },
            CareLog {
                id: None,
                content: "食欲あり".to_string(),
            },
        ];
        let value: Value = serde_json::from_str(&risk_user_content(&logs)).unwrap();
        assert_eq!(value["careLogs"][0]["id"], 1);
        assert_eq!(value["careLogs"][1]["content"], "食欲あり");
        assert!(value["careLogs"][1].get("id").is_none());
    }

    #[test]
    fn test_prompts_embed_schema() {
        assert!(risk_system_prompt().contains("\"riskLevel\": \"medium|high\""));
        assert!(risk_system_prompt().contains("{id, content}"));
        assert!(refine_system_prompt().contains("\"severity\": \"medium|high\""));
        assert!(summary_system_prompt().contains("日本語"));
    }
}
