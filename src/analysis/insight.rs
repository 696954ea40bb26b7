use serde::Serialize;

use crate::analysis::classifier::{classify, StatusTier};
use crate::analysis::sentiment::SentimentLabel;
use crate::error::Result;
use crate::indicators::registry::Registry;
use crate::indicators::IndicatorKey;

/// Value-dependent reading of an indicator: a headline plus supporting paragraphs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Commentary {
    pub headline: String,
    pub paragraphs: Vec<String>,
}

/// Everything the detail view shows for one indicator.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorAnalysis {
    pub key: IndicatorKey,
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub value: f64,
    pub formatted_value: String,
    pub status: StatusTier,
    pub status_label: String,
    pub threshold_text: String,
    pub week_change: Option<f64>,
    pub sentiment_score: u8,
    pub sentiment_label: SentimentLabel,
    pub commentary: Commentary,
    pub historical: String,
    pub recommendations: Vec<String>,
}

struct Profile {
    title: &'static str,
    description: &'static str,
    keywords: [&'static str; 5],
    historical: &'static str,
}

fn profile(key: IndicatorKey) -> Profile {
    match key {
        IndicatorKey::Vix => Profile {
            title: "VIX (Fear Index) In Depth",
            description: "Market volatility and investor psychology, read together",
            keywords: ["#VIX", "#MarketAnxiety", "#Volatility", "#RiskOff", "#InvestorPsychology"],
            historical: "VIX spiked to 89.53 in the 2008 financial crisis and hit 82.69 in the 2020 COVID crash. Comparing today's level against those peaks shows how stressed the market is.",
        },
        IndicatorKey::Skew => Profile {
            title: "SKEW (Tail Risk Index) In Depth",
            description: "Crash risk priced into options and how alert investors are to it",
            keywords: ["#SKEW", "#TailRisk", "#CrashWatch", "#BlackSwan", "#RiskManagement"],
            historical: "SKEW was above 150 ahead of the February 2018 Volmageddon. High-SKEW regimes have historically been prone to unexpected shocks.",
        },
        IndicatorKey::PutCall => Profile {
            title: "Put/Call Ratio In Depth",
            description: "Sentiment and positioning in the options market",
            keywords: ["#PutCall", "#MarketSentiment", "#Options", "#BullsVsBears", "#Positioning"],
            historical: "The ratio jumped to 1.8 in the March 2020 COVID crash, which marked the start of a strong rebound. Near the 2021 highs it fell into the 0.5s ahead of a correction.",
        },
        IndicatorKey::HySpread => Profile {
            title: "High Yield Spread In Depth",
            description: "Credit risk and liquidity stress",
            keywords: ["#HYSpread", "#CreditRisk", "#HighYield", "#CorporateBonds", "#Liquidity"],
            historical: "Spreads blew out past 20% in 2008, reached the 8% range in the 2015-16 commodity slump and topped 10% in March 2020. Very tight spreads (3% or less) can signal complacency.",
        },
        IndicatorKey::ShillerPe => Profile {
            title: "Shiller P/E (CAPE) In Depth",
            description: "Cyclically adjusted equity valuation",
            keywords: ["#ShillerPE", "#CAPE", "#Valuation", "#CheapOrExpensive", "#LongTermInvesting"],
            historical: "The long-run average is 16.8. CAPE peaked at 32 in 1929 before the crash, hit a record 44 in 2000 (followed by -50%) and bottomed at 13 in 2009. Readings under 20 have historically been great entry points.",
        },
        IndicatorKey::Ma200Deviation => Profile {
            title: "200-Day MA Deviation In Depth",
            description: "Trend and momentum of the broad market",
            keywords: ["#200DMA", "#MovingAverage", "#Trend", "#TechnicalAnalysis", "#Momentum"],
            historical: "The index fell to -25% below its 200-day line in 2008 and -15% in March 2020 before bottoming. Bull markets typically run +10-15% above it, and 0% acts as key support or resistance.",
        },
        IndicatorKey::FearGreed => Profile {
            title: "Fear & Greed Index In Depth",
            description: "Composite read of market emotion and investor sentiment",
            keywords: ["#FearAndGreed", "#MarketPsychology", "#Sentiment", "#InvestorMood", "#Contrarian"],
            historical: "The index dropped to 12 in the March 2020 COVID crash, the launch point for a big rebound. It reached 95 near the November 2021 highs before a correction.",
        },
        IndicatorKey::BuffettIndicator => Profile {
            title: "Buffett Indicator In Depth",
            description: "Total market cap against GDP as a gauge of over- or undervaluation",
            keywords: ["#BuffettIndicator", "#Overvalued", "#Valuation", "#MarketCap", "#GDP"],
            historical: "It peaked around 140% in the 2000 dot-com bubble before a 50% crash, and topped 200% in 2021 ahead of the 2022 correction. Below 100% has historically been a buying zone.",
        },
    }
}

fn commentary(key: IndicatorKey, value: f64, shown: &str) -> Commentary {
    let (headline, lead, data, trend): (&str, String, &str, &str) = match key {
        IndicatorKey::Vix if value >= 30.0 => (
            "High Risk Warning",
            format!("VIX has reached {shown} and the market is in extreme anxiety."),
            "Historically the average drawdown after VIX crosses 30 is about -15%. The current level is close to the March 2020 COVID shock.",
            "Defensive repositioning dominates investor discussion and institutions are accelerating risk reduction.",
        ),
        IndicatorKey::Vix if value >= 20.0 => (
            "Caution",
            format!("VIX is at {shown}, higher than usual. Participants are getting nervous."),
            "Short-term pullbacks are common at this level.",
            "Sentiment has turned cautious, with more talk of waiting it out and trimming positions.",
        ),
        IndicatorKey::Vix => (
            "Stable",
            format!("VIX is at {shown} and the market is relatively calm."),
            "Equities tend to hold their uptrend in low-VIX environments.",
            "Optimism prevails, with buy-the-dip talk standing out.",
        ),
        IndicatorKey::Skew if value >= 145.0 => (
            "Crash Risk Warning",
            format!("SKEW has reached {shown}; investors are pricing heavy downside tail risk."),
            "Elevated SKEW means participants are aggressively buying out-of-the-money puts.",
            "Professionals are talking about black swans and institutions are strengthening hedges.",
        ),
        IndicatorKey::Skew if value >= 135.0 => (
            "Alert",
            format!("SKEW is at {shown}, above normal. The market is sensitive to latent risk."),
            "Reactions to unexpected news tend to be exaggerated at this level.",
            "Risk management and portfolio defence are getting more attention.",
        ),
        IndicatorKey::Skew => (
            "Normal Range",
            format!("SKEW is at {shown}; concern about tail risk is limited."),
            "Participants are not overly worried about a large crash.",
            "Risk-on positioning is the mainstream stance.",
        ),
        IndicatorKey::PutCall if value <= 0.7 => (
            "Excess Optimism Warning",
            format!("The put/call ratio is {shown}; the market is overly optimistic."),
            "Call buying vastly outweighs put buying. Historically this has often preceded corrections.",
            "Retail bullishness dominates while professionals have started taking profits.",
        ),
        IndicatorKey::PutCall if value >= 1.2 => (
            "Excess Pessimism",
            format!("The put/call ratio is {shown}; the market is overly pessimistic."),
            "Put buying has surged as investors brace for declines. This level has often marked a bottom.",
            "Pessimism is everywhere, which is paradoxically a contrarian buy signal.",
        ),
        IndicatorKey::PutCall => (
            "Balanced",
            format!("The put/call ratio is {shown}; sentiment is balanced."),
            "Bulls and bears are evenly matched, which supports healthy price discovery.",
            "Opinions are varied with no one-sided skew.",
        ),
        IndicatorKey::HySpread if value >= 5.0 => (
            "Credit Risk Warning",
            format!("The high yield spread is {shown}; tension is building in credit markets."),
            "The gap between junk and Treasury yields is widening as investors grow sensitive to credit risk.",
            "A flight to quality is under way and corporate funding conditions are deteriorating.",
        ),
        IndicatorKey::HySpread if value >= 3.5 => (
            "Somewhat Elevated",
            format!("The high yield spread is {shown}, slightly high."),
            "Caution about credit risk is gradually rising, possibly on slowdown fears.",
            "Bond investors are turning more cautious.",
        ),
        IndicatorKey::HySpread => (
            "Healthy Credit",
            format!("The high yield spread is {shown}; credit markets are stable."),
            "Concern about corporate credit is limited and funding conditions are good.",
            "Credit markets are in a risk-on mood.",
        ),
        IndicatorKey::ShillerPe if value >= 30.0 => (
            "Overvaluation Warning",
            format!("The Shiller P/E is {shown}; stocks are historically expensive."),
            "Over more than 140 years of data this level sits in the top decile.",
            "Value investors say it is too expensive while others argue this time is different.",
        ),
        IndicatorKey::ShillerPe if value >= 25.0 => (
            "Somewhat Expensive",
            format!("The Shiller P/E is {shown}, above average."),
            "It is well above the long-run average of about 16.8, so a careful approach is needed.",
            "Valuation concerns are slowly spreading.",
        ),
        IndicatorKey::ShillerPe => (
            "Fair to Cheap",
            format!("The Shiller P/E is {shown}; valuations are healthy."),
            "Ten-year returns from this level have historically been good.",
            "Value investors see a buying opportunity.",
        ),
        IndicatorKey::Ma200Deviation if value <= 0.0 => (
            "Downtrend",
            format!("The 200-day MA deviation is {shown}; the market is in a downtrend."),
            "Price is below its 200-day average, a technical bear-market signal.",
            "Technicians are debating a trend reversal and stop-loss talk is rising.",
        ),
        IndicatorKey::Ma200Deviation if value >= 5.0 => (
            "Strong Uptrend",
            format!("The 200-day MA deviation is {shown}; the market is in a strong uptrend."),
            "Price is well above the 200-day line. Stretches beyond 10% raise short-term pullback risk.",
            "Technicals say the uptrend continues and momentum investors are active.",
        ),
        IndicatorKey::Ma200Deviation => (
            "Turning Point",
            format!("The 200-day MA deviation is {shown}; the trend is at an inflection."),
            "The market sits at an important level while direction is decided.",
            "Traders are watching which way the breakout goes.",
        ),
        IndicatorKey::FearGreed if value <= 25.0 => (
            "Extreme Fear",
            format!("The Fear & Greed Index is {shown}; the market is in extreme fear."),
            "Historically this level has often been a strong contrarian buying opportunity.",
            "Negativity dominates, which paradoxically often signals a bottom.",
        ),
        IndicatorKey::FearGreed if value >= 75.0 => (
            "Extreme Greed",
            format!("The Fear & Greed Index is {shown}; the market is overly optimistic."),
            "This level signals rising correction risk. Past data shows an average -8% pullback within one to two months.",
            "Everyone-is-buying talk is everywhere and experts are warning of overheating.",
        ),
        IndicatorKey::FearGreed => (
            "Neutral",
            format!("The Fear & Greed Index is {shown}; sentiment is balanced."),
            "Prices are more likely to be set by fundamentals at this level.",
            "Opinion is split between cautious and optimistic camps.",
        ),
        IndicatorKey::BuffettIndicator if value >= 150.0 => (
            "Bubble Warning",
            format!("The Buffett Indicator is {shown}, a historically high level."),
            "Market cap exceeds 1.5x GDP, the level Warren Buffett calls a danger signal.",
            "Analysts are raising valuation concerns and bubble talk is picking up.",
        ),
        IndicatorKey::BuffettIndicator if value >= 100.0 => (
            "Leaning Expensive",
            format!("The Buffett Indicator is {shown}; stocks are somewhat expensive."),
            "Market cap above 100% of GDP is historically uncommon and calls for caution.",
            "Wariness about valuations is slowly spreading.",
        ),
        IndicatorKey::BuffettIndicator => (
            "Fair to Cheap",
            format!("The Buffett Indicator is {shown}; valuations are healthy."),
            "This level has often been a good time for long-term investing.",
            "Value investors rate it a buying zone.",
        ),
    };

    Commentary {
        headline: headline.to_string(),
        paragraphs: vec![lead, format!("Market data: {data}"), format!("Sentiment trend: {trend}")],
    }
}

fn recommendations(key: IndicatorKey, value: f64) -> [&'static str; 4] {
    match key {
        IndicatorKey::Vix if value >= 30.0 => [
            "Shift money toward defensive sectors (staples, healthcare)",
            "Raise the portfolio's cash allocation to 20-30%",
            "Hedge with put options",
            "Reduce exposure to high-beta stocks",
        ],
        IndicatorKey::Vix if value >= 20.0 => [
            "Trim position sizes to 70-80% of normal",
            "Consider taking profits",
            "Add quality defensive names gradually",
            "Tighten stop-loss levels",
        ],
        IndicatorKey::Vix => [
            "Look at growth stock opportunities",
            "Invest actively while diversifying risk",
            "Watch for buy-the-dip chances",
            "Keep up regular contributions per the long-term plan",
        ],
        IndicatorKey::Skew if value >= 145.0 => [
            "Put tail-risk hedges in place now",
            "Spread out concentrated positions",
            "Cut leveraged positions substantially",
            "Raise safe assets such as gold and Treasuries to 25-35%",
        ],
        IndicatorKey::Skew => [
            "Continue the normal risk process",
            "Monitor the market regularly",
            "Check stop-loss settings",
            "Rebalance the portfolio on schedule",
        ],
        IndicatorKey::PutCall if value <= 0.7 => [
            "Hold off on new buys and prioritise taking profits",
            "Hedge with put options",
            "Raise cash to 30-40%",
            "Wait for a correction",
        ],
        IndicatorKey::PutCall if value >= 1.2 => [
            "Consider contrarian buying of quality stocks",
            "Invest with a long holding period",
            "Buy in stages on weakness",
            "Use volatility to your advantage",
        ],
        IndicatorKey::PutCall => [
            "Stay focused on fundamentals",
            "Keep a balanced portfolio",
            "Continue normal risk management",
            "Rebalance on schedule",
        ],
        IndicatorKey::HySpread if value >= 5.0 => [
            "Cut high yield bond holdings",
            "Shift to investment-grade and government bonds",
            "Review exposure to weak credits",
            "Raise cash and safe assets",
        ],
        IndicatorKey::HySpread if value >= 3.5 => [
            "Watch credit risk more closely",
            "Increase the share of highly rated bonds",
            "Do thorough credit analysis",
            "Manage risk through diversification",
        ],
        IndicatorKey::HySpread => [
            "Take appropriate credit risk",
            "Look for high yield opportunities",
            "Balance risk and return",
            "Run credit analysis regularly",
        ],
        IndicatorKey::ShillerPe if value >= 30.0 => [
            "Take profits on high-P/E names in stages",
            "Rotate into cheap value stocks",
            "Focus on high dividend yields",
            "Keep dry powder for a correction",
        ],
        IndicatorKey::ShillerPe if value >= 25.0 => [
            "Pick stocks with valuation in mind",
            "Be careful with expensive growth stocks",
            "Concentrate on quality companies",
            "Keep a long-term view",
        ],
        IndicatorKey::ShillerPe => [
            "Treat it as an active investment opportunity",
            "Hold quality stocks for the long term",
            "Keep dollar-cost averaging",
            "A possible historic buying opportunity",
        ],
        IndicatorKey::Ma200Deviation if value <= 0.0 => [
            "Wait and see short term, prepare to buy dips",
            "Be careful with new buys until the 200-day line is regained",
            "Tighten stop-losses",
            "Contrarians can consider buying in stages",
        ],
        IndicatorKey::Ma200Deviation if value >= 5.0 => [
            "Keep following the trend",
            "Take partial profits when the gap gets too wide",
            "Use trailing stops",
            "Wait for a pullback to add",
        ],
        IndicatorKey::Ma200Deviation => [
            "Stay cautious until direction is confirmed",
            "Try small positions",
            "Follow the breakout once it happens",
            "Put risk management first",
        ],
        IndicatorKey::FearGreed if value <= 25.0 => [
            "Add quality stocks gradually as a contrarian",
            "Execute the crash shopping list",
            "Invest with a long holding period",
            "A good time to start dollar-cost averaging",
        ],
        IndicatorKey::FearGreed if value >= 75.0 => [
            "Take profits actively",
            "Keep new positions small",
            "Consider hedging with puts",
            "Raise cash to prepare for a correction",
        ],
        IndicatorKey::FearGreed => [
            "Keep investing on fundamentals",
            "Maintain a balanced portfolio",
            "Rebalance regularly",
            "Stick to the long-term plan",
        ],
        IndicatorKey::BuffettIndicator if value >= 150.0 => [
            "Reduce exposure to richly valued stocks",
            "Shift toward cheap value stocks",
            "Raise cash and bonds to 40-50%",
            "Keep funds ready to buy a correction",
        ],
        IndicatorKey::BuffettIndicator if value >= 100.0 => [
            "Pick stocks with valuation in mind",
            "Take profits on expensive growth stocks in stages",
            "Keep a balanced portfolio",
            "Concentrate on quality companies",
        ],
        IndicatorKey::BuffettIndicator => [
            "Treat it as an active investment opportunity",
            "Hold quality stocks for the long term",
            "Keep dollar-cost averaging",
            "Balance growth and value",
        ],
    }
}

/// Assemble the detail view for one indicator at `value`.
pub fn analyze(
    registry: &Registry,
    key: IndicatorKey,
    value: f64,
    week_change: Option<f64>,
    sentiment_score: u8,
) -> Result<IndicatorAnalysis> {
    let spec = registry.get(key)?;
    let status = classify(spec, value);
    let formatted_value = spec.format_value(value);
    let profile = profile(key);

    Ok(IndicatorAnalysis {
        key,
        title: profile.title.to_string(),
        description: profile.description.to_string(),
        keywords: profile.keywords.iter().map(|k| k.to_string()).collect(),
        value,
        status,
        status_label: status.label().to_string(),
        threshold_text: spec.threshold_text(),
        week_change,
        sentiment_score,
        sentiment_label: SentimentLabel::from_score(sentiment_score),
        commentary: commentary(key, value, &formatted_value),
        historical: profile.historical.to_string(),
        recommendations: recommendations(key, value).iter().map(|r| r.to_string()).collect(),
        formatted_value,
    })
}
